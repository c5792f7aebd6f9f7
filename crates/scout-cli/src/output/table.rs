#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Narrowest a column is squeezed to when fitting the terminal.
const MIN_COLUMN_WIDTH: usize = 6;

/// Render an aligned table. Numeric cells are right aligned; overlong cells
/// are cut with an ellipsis once the columns exceed `max_width`.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
                .max(MIN_COLUMN_WIDTH)
        })
        .collect();

    fit_widths(&mut widths, headers, options.max_width);

    let header_line = headers
        .iter()
        .zip(widths.iter())
        .map(|(header, width)| pad(&truncate_text(header, *width), *width, false))
        .collect::<Vec<_>>()
        .join("  ");
    let divider = "-".repeat(header_line.chars().count());
    let header_line = if options.color {
        format!("\u{1b}[1m{header_line}\u{1b}[0m")
    } else {
        header_line
    };

    let row_lines = rows.iter().map(|row| {
        widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let value = row.get(index).map_or("-", String::as_str);
                let truncated = truncate_text(value, *width);
                let numeric = looks_numeric(&truncated);
                pad(&truncated, *width, numeric)
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    });

    let mut lines = Vec::with_capacity(2 + rows.len());
    lines.push(header_line);
    lines.push(divider);
    lines.extend(row_lines);
    lines.join("\n")
}

/// Shrink the widest column one step at a time until the row fits.
fn fit_widths(widths: &mut [usize], headers: &[&str], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };

    let separators = widths.len().saturating_sub(1) * 2;
    let mut total = widths.iter().sum::<usize>() + separators;

    while total > max_width {
        let candidate = widths
            .iter()
            .enumerate()
            .filter(|(idx, width)| **width > headers[*idx].chars().count().max(MIN_COLUMN_WIDTH))
            .max_by_key(|(idx, width)| (**width, std::cmp::Reverse(*idx)))
            .map(|(idx, _)| idx);

        let Some(idx) = candidate else {
            break;
        };
        widths[idx] -= 1;
        total -= 1;
    }
}

fn truncate_text(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }

    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.'))
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(value.chars().count()));
    if right_align {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
        cells
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect()
    }

    #[test]
    fn aligns_text_left_and_numbers_right() {
        let rendered = render_table(
            &["repo", "year"],
            &rows(&[&["p1", "2021"], &["queues", "2022"]]),
            TableOptions {
                max_width: None,
                color: false,
            },
        );
        assert_eq!(
            rendered,
            "repo    year  \n--------------\np1        2021\nqueues    2022"
        );
    }

    #[test]
    fn fits_terminal_width_by_truncating_widest_column() {
        let long_title = "Monte Carlo simulation of urban traffic flow";
        let rendered = render_table(
            &["repo", "title"],
            &rows(&[&["p1", long_title]]),
            TableOptions {
                max_width: Some(40),
                color: false,
            },
        );
        let row = rendered.lines().nth(2).unwrap();
        assert!(row.chars().count() <= 40, "{row}");
        assert!(row.ends_with('…'));
    }

    #[test]
    fn color_wraps_header_only() {
        let rendered = render_table(
            &["repo"],
            &rows(&[&["p1"]]),
            TableOptions {
                max_width: None,
                color: true,
            },
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].starts_with("\u{1b}[1m"));
        assert_eq!(lines[1], "------");
        assert_eq!(lines[2], "p1");
    }

    #[test]
    fn missing_cells_render_as_dash() {
        let rendered = render_table(
            &["owner", "title"],
            &rows(&[&["a"]]),
            TableOptions {
                max_width: None,
                color: false,
            },
        );
        assert_eq!(rendered.lines().nth(2), Some("a       -"));
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_text("añoñoño", 4), "año…");
        assert_eq!(truncate_text("abcd", 1), "…");
    }
}
