//! `-f name=value` arguments to a [`FilterInput`].
//!
//! The value shape follows the filter's operator in the registry: overlap
//! filters split on commas, range filters read `from..to` (either side may be
//! omitted), everything else is passed through as text. Names the registry
//! does not know are passed through too so that the query builder reports
//! them as unknown filters.

use anyhow::{Context, bail};
use scout_core::enums::OperatorKind;
use scout_schema::SchemaRegistry;
use scout_search::{FilterInput, FilterValue};

/// Parse every `name=value` argument. A repeated name keeps the last value.
pub fn parse_filters(registry: &SchemaRegistry, raw: &[String]) -> anyhow::Result<FilterInput> {
    let mut input = FilterInput::new();
    for arg in raw {
        let (name, value) = split_arg(arg)?;
        let operator = registry.filter(name).ok().map(|filter| filter.operator);
        input.insert(name, filter_value(operator, value));
    }
    Ok(input)
}

fn split_arg(arg: &str) -> anyhow::Result<(&str, &str)> {
    let (name, value) = arg
        .split_once('=')
        .with_context(|| format!("invalid filter '{arg}': expected NAME=VALUE"))?;
    let name = name.trim();
    if name.is_empty() {
        bail!("invalid filter '{arg}': missing filter name");
    }
    Ok((name, value.trim()))
}

fn filter_value(operator: Option<OperatorKind>, raw: &str) -> FilterValue {
    match operator {
        Some(OperatorKind::ArrayOverlap) => FilterValue::List(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        Some(OperatorKind::Range) => match raw.split_once("..") {
            Some((from, to)) => FilterValue::Range {
                from: bound(from),
                to: bound(to),
            },
            None => FilterValue::between(raw, raw),
        },
        Some(OperatorKind::Equality | OperatorKind::FullText) | None => {
            FilterValue::Text(raw.to_string())
        }
    }
}

fn bound(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
