//! Student / project / library relationship graph over search results.
//!
//! Nodes live in a petgraph arena; a `(kind, key)` → `NodeIndex` map makes
//! creation idempotent and a set of `(source, target, kind)` triples does the
//! same for edges. Node and edge indices follow first-seen order, which is
//! the order [`ProjectGraph::to_graph`] serializes.

use std::collections::{HashMap, HashSet};

use rustworkx_core::connectivity::connected_components;
use rustworkx_core::petgraph::Direction;
use rustworkx_core::petgraph::graph::{DiGraph, NodeIndex};
use rustworkx_core::petgraph::visit::EdgeRef;
use scout_core::entities::{Graph, GraphEdge, GraphNode, GraphSummary, LibraryUsage, ProjectRecord};
use scout_core::enums::{EdgeKind, NodeKind};

use crate::error::GraphError;

type NodeKey = (NodeKind, String);

/// Built relationship graph.
///
/// Label conflicts keep the first-seen label: a project seen twice with
/// different titles, or a library spelled `NumPy` then `numpy`, is labelled
/// from its first occurrence.
#[derive(Debug, Clone, Default)]
pub struct ProjectGraph {
    graph: DiGraph<GraphNode, EdgeKind>,
    index: HashMap<NodeKey, NodeIndex>,
    edges: HashSet<(NodeIndex, NodeIndex, EdgeKind)>,
}

impl ProjectGraph {
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node by kind and key.
    #[must_use]
    pub fn node(&self, kind: NodeKind, key: &str) -> Option<&GraphNode> {
        self.index
            .get(&(kind, key.to_string()))
            .map(|&idx| &self.graph[idx])
    }

    #[must_use]
    pub fn contains_edge(&self, source: (NodeKind, &str), target: (NodeKind, &str), kind: EdgeKind) -> bool {
        let lookup = |(k, key): (NodeKind, &str)| self.index.get(&(k, key.to_string())).copied();
        match (lookup(source), lookup(target)) {
            (Some(s), Some(t)) => self.edges.contains(&(s, t, kind)),
            _ => false,
        }
    }

    /// Serializable node and edge lists in insertion order.
    #[must_use]
    pub fn to_graph(&self) -> Graph {
        let nodes = self
            .graph
            .node_indices()
            .map(|idx| self.graph[idx].clone())
            .collect();
        let edges = self
            .graph
            .edge_references()
            .map(|edge| GraphEdge {
                source: self.graph[edge.source()].id.clone(),
                target: self.graph[edge.target()].id.clone(),
                kind: *edge.weight(),
            })
            .collect();
        Graph { nodes, edges }
    }

    /// Counts per kind, weakly connected components, and the `top`
    /// libraries by number of projects using them.
    #[must_use]
    pub fn analyze(&self, top: usize) -> GraphSummary {
        let count = |kind: NodeKind| {
            self.graph
                .node_weights()
                .filter(|node| node.kind == kind)
                .count()
        };

        let mut usage: Vec<LibraryUsage> = self
            .graph
            .node_indices()
            .filter(|&idx| self.graph[idx].kind == NodeKind::Library)
            .map(|idx| LibraryUsage {
                library: self.graph[idx].key.clone(),
                projects: self
                    .graph
                    .edges_directed(idx, Direction::Incoming)
                    .filter(|edge| *edge.weight() == EdgeKind::Uses)
                    .count(),
            })
            .collect();
        usage.sort_by(|a, b| b.projects.cmp(&a.projects).then_with(|| a.library.cmp(&b.library)));
        usage.truncate(top);

        GraphSummary {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            projects: count(NodeKind::Project),
            students: count(NodeKind::Student),
            libraries: count(NodeKind::Library),
            components: connected_components(&self.graph).len(),
            top_libraries: usage,
        }
    }

    fn ensure_node(&mut self, kind: NodeKind, key: String, label: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(&(kind, key.clone())) {
            let existing = &self.graph[idx].label;
            if existing != label {
                tracing::debug!(
                    %kind,
                    %key,
                    kept = %existing,
                    ignored = %label,
                    "label conflict; keeping first-seen label"
                );
            }
            return idx;
        }
        let idx = self.graph.add_node(GraphNode::new(kind, key.clone(), label));
        self.index.insert((kind, key), idx);
        idx
    }

    fn ensure_edge(&mut self, source: NodeIndex, target: NodeIndex, kind: EdgeKind) {
        if self.edges.insert((source, target, kind)) {
            self.graph.add_edge(source, target, kind);
        }
    }
}

/// Folds project records into a [`ProjectGraph`].
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    graph: ProjectGraph,
    seen: usize,
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `records` in one pass.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::MalformedRecord` for a record with a blank owner
    /// or repo.
    pub fn build(records: &[ProjectRecord]) -> Result<ProjectGraph, GraphError> {
        let mut builder = Self::new();
        for record in records {
            builder.add(record)?;
        }
        Ok(builder.finish())
    }

    /// Add one record. Adding the same record again changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::MalformedRecord` for a record with a blank owner
    /// or repo; the graph is left as it was.
    pub fn add(&mut self, record: &ProjectRecord) -> Result<(), GraphError> {
        let index = self.seen;
        self.seen += 1;

        let owner = record.owner.trim();
        let repo = record.repo.trim();
        if owner.is_empty() || repo.is_empty() {
            return Err(GraphError::MalformedRecord {
                index,
                reason: format!("blank identity '{}/{}'", record.owner, record.repo),
            });
        }

        let project_key = format!("{owner}/{repo}");
        let label = record
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(&project_key)
            .to_string();
        let project = self
            .graph
            .ensure_node(NodeKind::Project, project_key.clone(), &label);

        for login in &record.team_members {
            let login = login.trim();
            if login.is_empty() {
                continue;
            }
            let student = self
                .graph
                .ensure_node(NodeKind::Student, login.to_string(), login);
            self.graph.ensure_edge(student, project, EdgeKind::Authored);
        }

        for library in &record.libraries {
            let name = library.trim();
            if name.is_empty() {
                continue;
            }
            let library = self
                .graph
                .ensure_node(NodeKind::Library, name.to_lowercase(), name);
            self.graph.ensure_edge(project, library, EdgeKind::Uses);
        }
        Ok(())
    }

    #[must_use]
    pub fn finish(self) -> ProjectGraph {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(owner: &str, repo: &str, team: &[&str], libs: &[&str]) -> ProjectRecord {
        ProjectRecord {
            team_members: team.iter().map(|s| (*s).to_string()).collect(),
            libraries: libs.iter().map(|s| (*s).to_string()).collect(),
            ..ProjectRecord::new(owner, repo)
        }
    }

    fn two_projects() -> Vec<ProjectRecord> {
        vec![
            record("a", "p1", &["alice", "bob"], &["numpy", "pandas"]),
            record("b", "p2", &["bob"], &["numpy"]),
        ]
    }

    #[test]
    fn shared_student_and_library_appear_once() {
        let graph = GraphBuilder::build(&two_projects()).unwrap();
        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count(), 6);

        let serialized = graph.to_graph();
        let bob = serialized.nodes.iter().filter(|n| n.key == "bob").count();
        let numpy = serialized.nodes.iter().filter(|n| n.key == "numpy").count();
        assert_eq!((bob, numpy), (1, 1));

        assert!(graph.contains_edge(
            (NodeKind::Student, "bob"),
            (NodeKind::Project, "b/p2"),
            EdgeKind::Authored
        ));
        assert!(graph.contains_edge(
            (NodeKind::Project, "b/p2"),
            (NodeKind::Library, "numpy"),
            EdgeKind::Uses
        ));
    }

    #[test]
    fn serialization_follows_first_seen_order() {
        let graph = GraphBuilder::build(&two_projects()).unwrap().to_graph();
        let keys: Vec<&str> = graph.nodes.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(keys, vec!["a/p1", "alice", "bob", "numpy", "pandas", "b/p2"]);
        assert_eq!(
            graph.edges[0],
            GraphEdge {
                source: "student:alice".into(),
                target: "project:a/p1".into(),
                kind: EdgeKind::Authored,
            }
        );
    }

    #[test]
    fn building_twice_is_idempotent() {
        let records = two_projects();
        let once = GraphBuilder::build(&records).unwrap().to_graph();

        let doubled: Vec<ProjectRecord> = records.iter().chain(records.iter()).cloned().collect();
        let twice = GraphBuilder::build(&doubled).unwrap().to_graph();
        assert_eq!(once, twice);
        assert_eq!(GraphBuilder::build(&records).unwrap().to_graph(), once);
    }

    #[test]
    fn node_and_edge_counts_are_bounded() {
        let records = vec![
            record("a", "p1", &["alice", "alice", "bob"], &["numpy", "NumPy", "scipy"]),
            record("a", "p2", &["carol"], &[]),
            record("c", "p3", &[], &["numpy"]),
        ];
        let graph = GraphBuilder::build(&records).unwrap();
        let members: usize = records.iter().map(|r| r.team_members.len()).sum();
        let libs: usize = records.iter().map(|r| r.libraries.len()).sum();
        assert!(graph.node_count() <= records.len() + members + libs);
        assert!(graph.edge_count() <= members + libs);
        // alice, bob, carol + numpy, scipy + 3 projects
        assert_eq!(graph.node_count(), 8);
        assert_eq!(graph.edge_count(), 6);
    }

    #[test]
    fn library_keys_are_case_and_space_folded() {
        let records = vec![
            record("a", "p1", &[], &["NumPy "]),
            record("b", "p2", &[], &["numpy"]),
        ];
        let graph = GraphBuilder::build(&records).unwrap();
        let numpy = graph.node(NodeKind::Library, "numpy").unwrap();
        assert_eq!(numpy.label, "NumPy");
        assert_eq!(graph.analyze(5).libraries, 1);
    }

    #[test]
    fn blank_names_are_skipped() {
        let records = vec![record("a", "p1", &["", "  ", "alice"], &[" ", "numpy"])];
        let graph = GraphBuilder::build(&records).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn blank_identity_is_malformed() {
        let records = vec![record("a", "p1", &["alice"], &[]), record("b", " ", &[], &[])];
        let err = GraphBuilder::build(&records).unwrap_err();
        assert!(matches!(err, GraphError::MalformedRecord { index: 1, .. }));
    }

    #[test]
    fn malformed_record_leaves_builder_untouched() {
        let mut builder = GraphBuilder::new();
        builder.add(&record("a", "p1", &["alice"], &[])).unwrap();
        assert!(builder.add(&record("", "p2", &["bob"], &["numpy"])).is_err());
        let graph = builder.finish();
        assert_eq!(graph.node_count(), 2);
        assert!(graph.node(NodeKind::Student, "bob").is_none());
    }

    #[test]
    fn project_label_prefers_title_and_keeps_first() {
        let mut first = record("a", "p1", &[], &[]);
        first.title = Some("Monte Carlo Traffic".into());
        let mut second = first.clone();
        second.title = Some("Renamed".into());
        let untitled = record("b", "p2", &[], &[]);

        let graph = GraphBuilder::build(&[first, second, untitled]).unwrap();
        assert_eq!(graph.node(NodeKind::Project, "a/p1").unwrap().label, "Monte Carlo Traffic");
        assert_eq!(graph.node(NodeKind::Project, "b/p2").unwrap().label, "b/p2");
    }

    #[test]
    fn student_and_library_with_same_name_stay_distinct() {
        let records = vec![record("a", "p1", &["numpy"], &["numpy"])];
        let graph = GraphBuilder::build(&records).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert!(graph.node(NodeKind::Student, "numpy").is_some());
        assert!(graph.node(NodeKind::Library, "numpy").is_some());

        let serialized = graph.to_graph();
        let ids: Vec<&str> = serialized.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["project:a/p1", "student:numpy", "library:numpy"]);
        assert_eq!(
            serialized.edges,
            vec![
                GraphEdge {
                    source: "student:numpy".into(),
                    target: "project:a/p1".into(),
                    kind: EdgeKind::Authored,
                },
                GraphEdge {
                    source: "project:a/p1".into(),
                    target: "library:numpy".into(),
                    kind: EdgeKind::Uses,
                },
            ]
        );
        // Every edge endpoint resolves to exactly one node.
        for edge in &serialized.edges {
            for end in [&edge.source, &edge.target] {
                assert_eq!(serialized.nodes.iter().filter(|n| &n.id == end).count(), 1);
            }
        }
    }

    #[test]
    fn analyze_summarizes_graph() {
        let mut records = two_projects();
        records.push(record("z", "solo", &["zed"], &["torch"]));
        let summary = GraphBuilder::build(&records).unwrap().analyze(2);

        assert_eq!(summary.node_count, 9);
        assert_eq!(summary.edge_count, 8);
        assert_eq!((summary.projects, summary.students, summary.libraries), (3, 3, 3));
        assert_eq!(summary.components, 2);
        assert_eq!(
            summary.top_libraries,
            vec![
                LibraryUsage {
                    library: "numpy".into(),
                    projects: 2
                },
                LibraryUsage {
                    library: "pandas".into(),
                    projects: 1
                },
            ]
        );
    }

    #[test]
    fn empty_input_builds_empty_graph() {
        let graph = GraphBuilder::build(&[]).unwrap();
        assert_eq!(graph.to_graph(), Graph::default());
        assert_eq!(graph.analyze(3).components, 0);
    }
}
