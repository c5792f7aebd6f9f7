//! Schema error types.

use std::path::PathBuf;

use scout_core::enums::{OperatorKind, ValueKind};
use thiserror::Error;

/// Errors from loading, validating, or querying the schema registry.
///
/// Every variant except `NotFound` and `ValidationFailed` is raised by
/// `SchemaRegistry::load` and is fatal at startup.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema document is not valid TOML or has the wrong shape.
    #[error("Schema parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The schema file could not be read.
    #[error("Failed to read schema file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Lookup of a field or filter that the registry does not define.
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// Two fields share a name.
    #[error("Duplicate field: {0}")]
    DuplicateField(String),

    /// Two filters share a name.
    #[error("Duplicate filter: {0}")]
    DuplicateFilter(String),

    /// A filter is bound to a field the schema does not define.
    #[error("Filter '{filter}' references undefined field '{field}'")]
    UnknownFilterField { filter: String, field: String },

    /// A display column names a field the schema does not define.
    #[error("Display column references undefined field '{0}'")]
    UnknownDisplayField(String),

    /// Two fields map to the same storage column with different kinds.
    #[error("Column '{column}' is declared as both {first} and {second}")]
    ConflictingColumnKinds {
        column: String,
        first: ValueKind,
        second: ValueKind,
    },

    /// The filter's operator cannot be applied to its field's kind.
    #[error("Filter '{filter}': operator {operator} cannot apply to {kind} field '{field}'")]
    IncompatibleOperator {
        filter: String,
        operator: OperatorKind,
        field: String,
        kind: ValueKind,
    },

    /// A full-text filter is bound to a field that is not in the text index.
    #[error("Filter '{filter}': field '{field}' is not searchable")]
    NotSearchable { filter: String, field: String },

    /// A `searchable` field's column is not one the FTS table indexes.
    #[error("Field '{field}': column '{column}' is not in the full-text index")]
    NotIndexed { field: String, column: String },

    /// A table or column name is not a plain SQL identifier.
    #[error("Invalid SQL identifier: '{0}'")]
    InvalidIdentifier(String),

    /// JSON value did not pass record validation.
    #[error("Validation failed: {errors:?}")]
    ValidationFailed {
        /// Individual error messages from the validator.
        errors: Vec<String>,
    },

    /// Schema generation or compilation error.
    #[error("Schema generation error: {0}")]
    Generation(String),
}
