//! Entity structs for the catalog.
//!
//! `ProjectRecord` maps to a row of the `projects` table; `IngestRecord` is the
//! enriched shape accepted by ingestion; the graph types are the serialized
//! output of the relationship graph builder. All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema`.

mod graph;
mod project;

pub use graph::{Graph, GraphEdge, GraphNode, GraphSummary, LibraryUsage, node_id};
pub use project::{Contributor, IngestRecord, ProjectRecord};
