//! Runs compiled queries against the libSQL store.
//!
//! One `SELECT` per call, bounded by a row cap and a wall-clock timeout.
//! Results are all-or-nothing: any fault discards the rows read so far.

use std::time::Duration;

use scout_core::entities::ProjectRecord;
use scout_core::enums::ValueKind;
use scout_db::ScoutDb;
use scout_db::helpers::{parse_optional_datetime, parse_string_array};
use serde_json::{Map, Value};

use crate::error::SearchError;
use crate::query::{CompiledQuery, SelectColumn, SqlValue};

/// Storage columns that map straight onto [`ProjectRecord`] attributes.
/// Anything else lands in `ProjectRecord::extra` under its field name.
const RECORD_COLUMNS: &[&str] = &[
    "id",
    "owner",
    "repo",
    "title",
    "year",
    "semester",
    "team_members",
    "repository_url",
    "libraries",
    "created_at",
];

/// `SQLITE_BUSY`, `SQLITE_LOCKED`, `SQLITE_INTERRUPT`, `SQLITE_CANTOPEN`
/// (primary codes).
const UNAVAILABLE_CODES: [i32; 4] = [5, 6, 9, 14];

/// Bounds applied to every execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorLimits {
    /// Hard cap on returned rows, whatever the caller asks for.
    pub max_rows: usize,
    /// Upper bound on the store round-trip.
    pub timeout: Duration,
}

impl Default for ExecutorLimits {
    fn default() -> Self {
        Self {
            max_rows: 10_000,
            timeout: Duration::from_secs(5),
        }
    }
}

pub struct SearchExecutor<'a> {
    db: &'a ScoutDb,
    limits: ExecutorLimits,
}

impl<'a> SearchExecutor<'a> {
    #[must_use]
    pub const fn new(db: &'a ScoutDb, limits: ExecutorLimits) -> Self {
        Self { db, limits }
    }

    #[must_use]
    pub const fn limits(&self) -> ExecutorLimits {
        self.limits
    }

    /// Row cap actually applied for a requested `row_limit`.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidRowLimit` for zero.
    pub fn effective_limit(&self, row_limit: usize) -> Result<usize, SearchError> {
        if row_limit == 0 {
            return Err(SearchError::InvalidRowLimit(row_limit));
        }
        Ok(row_limit.min(self.limits.max_rows))
    }

    /// Execute `query` and decode at most `row_limit` records, in the
    /// query's order.
    ///
    /// The local store steps SQLite synchronously, so the round-trip runs on
    /// a blocking thread. When the timeout expires the connection is
    /// interrupted and the rows read so far are dropped.
    ///
    /// # Errors
    ///
    /// - `InvalidRowLimit` when `row_limit` is zero
    /// - `StoreUnavailable` when the store cannot be reached, is locked, or
    ///   the timeout expires
    /// - `QueryExecution` for any other store fault or undecodable row
    pub async fn execute(
        &self,
        query: &CompiledQuery,
        row_limit: usize,
    ) -> Result<Vec<ProjectRecord>, SearchError> {
        let limit = self.effective_limit(row_limit)?;
        let timeout = self.limits.timeout;

        let conn = self.db.conn().clone();
        let owned = query.clone();
        let runtime = tokio::runtime::Handle::current();
        let mut task =
            tokio::task::spawn_blocking(move || runtime.block_on(fetch(&conn, &owned, limit)));

        let records = match tokio::time::timeout(timeout, &mut task).await {
            Ok(joined) => joined.map_err(|e| {
                SearchError::QueryExecution(format!("search task failed: {e}"))
            })??,
            Err(_) => {
                match self.db.conn().interrupt() {
                    // Let the statement unwind so the connection is idle again.
                    Ok(()) => drop(task.await),
                    Err(error) => {
                        tracing::warn!(%error, "could not interrupt timed-out search");
                    }
                }
                return Err(SearchError::StoreUnavailable(format!(
                    "no response within {} ms",
                    timeout.as_millis()
                )));
            }
        };

        tracing::info!(
            rows = records.len(),
            limit,
            ranked = query.has_full_text(),
            "search executed"
        );
        Ok(records)
    }
}

async fn fetch(
    conn: &libsql::Connection,
    query: &CompiledQuery,
    limit: usize,
) -> Result<Vec<ProjectRecord>, SearchError> {
    let sql = query.sql();
    let mut params: Vec<libsql::Value> = query.parameters.iter().map(libsql::Value::from).collect();
    params.push(libsql::Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));

    tracing::debug!(%sql, parameters = params.len(), "executing search");

    let mut rows = conn
        .query(&sql, libsql::params_from_iter(params))
        .await
        .map_err(classify)?;

    let mut records = Vec::new();
    while records.len() < limit {
        let Some(row) = rows.next().await.map_err(classify)? else {
            break;
        };
        records.push(decode_row(&row, query)?);
    }
    Ok(records)
}

impl From<&SqlValue> for libsql::Value {
    fn from(value: &SqlValue) -> Self {
        match value {
            SqlValue::Text(text) => Self::Text(text.clone()),
            SqlValue::Integer(n) => Self::Integer(*n),
        }
    }
}

/// Connection-level faults are `StoreUnavailable`; everything else is a
/// failed query.
pub(crate) fn classify(err: libsql::Error) -> SearchError {
    match &err {
        libsql::Error::ConnectionFailed(_) => SearchError::StoreUnavailable(err.to_string()),
        libsql::Error::SqliteFailure(code, _) if UNAVAILABLE_CODES.contains(&(code & 0xff)) => {
            SearchError::StoreUnavailable(err.to_string())
        }
        _ => SearchError::QueryExecution(err.to_string()),
    }
}

fn decode_row(row: &libsql::Row, query: &CompiledQuery) -> Result<ProjectRecord, SearchError> {
    let mut object = Map::with_capacity(query.select.len() + 1);
    for (idx, column) in query.select.iter().enumerate() {
        let value = row.get_value(column_index(idx)?).map_err(classify)?;
        let key = if RECORD_COLUMNS.contains(&column.column.as_str()) {
            column.column.clone()
        } else {
            column.field.clone()
        };
        object.insert(key, to_json(column, value)?);
    }

    if query.has_full_text() {
        let rank = match row
            .get_value(column_index(query.select.len())?)
            .map_err(classify)?
        {
            libsql::Value::Real(r) => Value::from(r),
            #[allow(clippy::cast_precision_loss)]
            libsql::Value::Integer(i) => Value::from(i as f64),
            _ => Value::Null,
        };
        object.insert("rank".to_string(), rank);
    }

    serde_json::from_value(Value::Object(object))
        .map_err(|e| SearchError::QueryExecution(format!("cannot decode row: {e}")))
}

fn column_index(idx: usize) -> Result<i32, SearchError> {
    i32::try_from(idx).map_err(|_| SearchError::QueryExecution(format!("column {idx} out of range")))
}

fn to_json(column: &SelectColumn, value: libsql::Value) -> Result<Value, SearchError> {
    let bad = |what: &str| {
        SearchError::QueryExecution(format!(
            "column '{}' holds {what}, expected {}",
            column.column, column.kind
        ))
    };

    Ok(match (column.kind, value) {
        (ValueKind::Array, libsql::Value::Null) => Value::Array(Vec::new()),
        (_, libsql::Value::Null) => Value::Null,
        (ValueKind::Text, libsql::Value::Text(s)) if s.is_empty() => Value::Null,
        (ValueKind::Text, libsql::Value::Text(s)) => Value::String(s),
        (ValueKind::Text, libsql::Value::Integer(i)) => Value::String(i.to_string()),
        (ValueKind::Integer, libsql::Value::Integer(i)) => Value::from(i),
        (ValueKind::Integer, libsql::Value::Text(s)) => {
            Value::from(s.trim().parse::<i64>().map_err(|_| bad("non-numeric text"))?)
        }
        (ValueKind::Array, libsql::Value::Text(s)) => {
            let items = parse_string_array(Some(&s))
                .map_err(|e| SearchError::QueryExecution(e.to_string()))?;
            Value::from(items)
        }
        (ValueKind::Timestamp, libsql::Value::Text(s)) => {
            match parse_optional_datetime(Some(&s))
                .map_err(|e| SearchError::QueryExecution(e.to_string()))?
            {
                Some(dt) => Value::String(dt.to_rfc3339()),
                None => Value::Null,
            }
        }
        (_, libsql::Value::Real(_)) => return Err(bad("a real number")),
        (_, libsql::Value::Blob(_)) => return Err(bad("a blob")),
        (_, libsql::Value::Integer(_)) => return Err(bad("an integer")),
    })
}
