//! Database error types for scout-db.

use scout_schema::SchemaError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or a column held unexpected data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// An ingest record failed validation. Nothing was written.
    #[error("Ingest record {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },

    /// The ingest record validator could not be built.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}
