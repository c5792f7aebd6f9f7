//! One-call search: compile, execute, and optionally build the graph.

use std::sync::Arc;

use scout_core::entities::ProjectRecord;
use scout_db::ScoutDb;
use scout_schema::SchemaRegistry;

use crate::error::SearchError;
use crate::executor::{ExecutorLimits, SearchExecutor};
use crate::graph::{GraphBuilder, ProjectGraph};
use crate::query::{CompiledQuery, FilterInput, QueryBuilder};

/// Columns the graph builder reads.
const GRAPH_COLUMNS: [&str; 3] = ["title", "team_members", "libraries"];

pub struct SearchEngine<'a> {
    registry: Arc<SchemaRegistry>,
    executor: SearchExecutor<'a>,
}

impl<'a> SearchEngine<'a> {
    #[must_use]
    pub const fn new(registry: Arc<SchemaRegistry>, db: &'a ScoutDb, limits: ExecutorLimits) -> Self {
        Self {
            registry,
            executor: SearchExecutor::new(db, limits),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Compile without executing.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Query` for any compile failure.
    pub fn compile(&self, input: &FilterInput, fields: &[&str]) -> Result<CompiledQuery, SearchError> {
        Ok(QueryBuilder::new(&self.registry).compile(input, fields)?)
    }

    /// Filter the catalog and return at most `row_limit` records.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Query` before touching the store if the input
    /// does not compile, otherwise any executor error.
    pub async fn search(
        &self,
        input: &FilterInput,
        fields: &[&str],
        row_limit: usize,
    ) -> Result<Vec<ProjectRecord>, SearchError> {
        let query = self.compile(input, fields)?;
        self.executor.execute(&query, row_limit).await
    }

    /// Filter the catalog and fold the matches into a relationship graph.
    ///
    /// # Errors
    ///
    /// Same as [`Self::search`], plus `SearchError::Graph` for a malformed
    /// result record.
    pub async fn graph(&self, input: &FilterInput, row_limit: usize) -> Result<ProjectGraph, SearchError> {
        let fields: Vec<&str> = GRAPH_COLUMNS
            .iter()
            .filter_map(|column| self.registry.field_for_column(column))
            .map(|field| field.name.as_str())
            .collect();
        let records = self.search(input, &fields, row_limit).await?;
        let graph = GraphBuilder::build(&records)?;
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "relationship graph built"
        );
        Ok(graph)
    }
}
