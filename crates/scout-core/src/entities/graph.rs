use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EdgeKind, NodeKind};

/// An entity in the relationship graph.
///
/// `key` is the deduplication identity within a kind: `owner/repo` for
/// projects, the login for students, and the lowercase canonical name for
/// libraries. `id` is `kind:key` and is unique across kinds, so a student
/// and a library that share a name stay apart once serialized.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub key: String,
    pub label: String,
}

impl GraphNode {
    #[must_use]
    pub fn new(kind: NodeKind, key: impl Into<String>, label: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            id: node_id(kind, &key),
            kind,
            key,
            label: label.into(),
        }
    }
}

/// Serialized node id: `project:a/p1`, `student:alice`, `library:numpy`.
#[must_use]
pub fn node_id(kind: NodeKind, key: &str) -> String {
    format!("{kind}:{key}")
}

/// A typed edge between two node ids.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

/// Serialized node and edge lists, both in first-seen order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// How many projects in a result set use a library.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LibraryUsage {
    pub library: String,
    pub projects: usize,
}

/// Aggregate counts over a built graph.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub projects: usize,
    pub students: usize,
    pub libraries: usize,
    /// Weakly connected components.
    pub components: usize,
    pub top_libraries: Vec<LibraryUsage>,
}
