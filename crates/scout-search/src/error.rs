//! Search error types for scout-search.

use thiserror::Error;

/// Caller-correctable problems with a filter input or field request.
///
/// Raised while compiling, so no store access has happened yet.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// A requested field is not in the schema.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The input names a filter that is undefined or disabled.
    #[error("unknown or disabled filter: {0}")]
    UnknownFilter(String),

    /// More than one full-text filter carries a value.
    #[error("full-text filters '{first}' and '{second}' cannot be combined")]
    ConflictingFullTextFilters { first: String, second: String },

    /// The value does not fit the filter's operator or field kind.
    #[error("invalid value for filter '{filter}': {reason}")]
    InvalidFilterValue { filter: String, reason: String },
}

/// Errors from building the relationship graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// A record lacks the identity needed to key its project node.
    #[error("malformed record at position {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },
}

/// Errors from running a search end to end.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The store could not be reached, was locked, or did not answer in time.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// The store rejected or failed the query.
    #[error("query execution failed: {0}")]
    QueryExecution(String),

    /// The row limit must be at least one.
    #[error("invalid row limit: {0}")]
    InvalidRowLimit(usize),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
