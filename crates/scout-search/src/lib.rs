//! # scout-search
//!
//! Schema-driven search over the scout project catalog.
//!
//! - [`query`]: compiles a filter input into a parameterized `SELECT`
//! - [`executor`]: runs a compiled query against libSQL with row and time bounds
//! - [`graph`]: folds result records into a student/project/library graph
//! - [`engine`]: compile, execute, and graph in one call
//!
//! The schema registry is shared read-only; every request builds its own
//! query, records, and graph.

pub mod engine;
pub mod error;
pub mod executor;
pub mod graph;
pub mod query;

pub use engine::SearchEngine;
pub use error::{GraphError, QueryError, SearchError};
pub use executor::{ExecutorLimits, SearchExecutor};
pub use graph::{GraphBuilder, ProjectGraph};
pub use query::{CompiledQuery, FilterInput, FilterValue, QueryBuilder};
