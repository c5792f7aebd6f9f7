//! Row parsing helpers shared by the repos and the search executor.
//!
//! Timestamps arrive in two shapes: RFC 3339 from ingestion and `SQLite`'s
//! `datetime('now')` format from column defaults.

use chrono::{DateTime, Utc};

use crate::error::DatabaseError;

/// Parse a TEXT column as `DateTime<Utc>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string is in neither format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Decode a JSON text array column. NULL and empty text decode as empty.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the text is not a JSON array of strings.
pub fn parse_string_array(s: Option<&str>) -> Result<Vec<String>, DatabaseError> {
    match s {
        Some(s) if !s.trim().is_empty() => serde_json::from_str(s)
            .map_err(|e| DatabaseError::Query(format!("Invalid JSON array in column: {e}"))),
        _ => Ok(Vec::new()),
    }
}

/// Encode a string list for a JSON text array column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if serialization fails.
pub fn encode_string_array(values: &[String]) -> Result<String, DatabaseError> {
    serde_json::to_string(values)
        .map_err(|e| DatabaseError::Query(format!("Failed to encode JSON array: {e}")))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_both_datetime_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 9, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_datetime("2024-09-01T12:30:00Z").unwrap(), expected);
        assert_eq!(parse_datetime("2024-09-01 12:30:00").unwrap(), expected);
        assert!(parse_datetime("last tuesday").is_err());
    }

    #[test]
    fn optional_datetime_treats_empty_as_none() {
        assert_eq!(parse_optional_datetime(None).unwrap(), None);
        assert_eq!(parse_optional_datetime(Some("")).unwrap(), None);
    }

    #[test]
    fn string_arrays() {
        assert_eq!(
            parse_string_array(Some(r#"["alice","bob"]"#)).unwrap(),
            vec!["alice".to_string(), "bob".to_string()]
        );
        assert!(parse_string_array(None).unwrap().is_empty());
        assert!(parse_string_array(Some("")).unwrap().is_empty());
        assert!(parse_string_array(Some("alice")).is_err());
        assert_eq!(
            encode_string_array(&["numpy".to_string()]).unwrap(),
            r#"["numpy"]"#
        );
    }
}
