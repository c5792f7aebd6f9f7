//! Closed enums for schema value kinds, filter operators, and graph kinds.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! so the same spelling is used in schema documents, JSON output, and SQL-facing
//! diagnostics.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ValueKind
// ---------------------------------------------------------------------------

/// How values of a schema field are stored and compared.
///
/// `Array` columns hold a JSON array of strings; `Timestamp` columns hold
/// RFC 3339 text (or `SQLite`'s `datetime('now')` format).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Text,
    Integer,
    Array,
    Timestamp,
}

impl ValueKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Array => "array",
            Self::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OperatorKind
// ---------------------------------------------------------------------------

/// Predicate shape a filter compiles to.
///
/// The set is closed: the query builder dispatches on it with an exhaustive
/// `match`, so adding a variant forces a new predicate constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    /// `column = ?`
    Equality,
    /// Set intersection between an array column and the supplied list.
    ArrayOverlap,
    /// Ranked full-text match over the indexed text.
    FullText,
    /// Independent optional lower/upper bounds.
    Range,
}

impl OperatorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equality => "equality",
            Self::ArrayOverlap => "array_overlap",
            Self::FullText => "full_text",
            Self::Range => "range",
        }
    }

    /// Whether this operator can be applied to a field of the given kind.
    ///
    /// Full-text additionally requires the field to be searchable; that check
    /// lives with the schema registry because it needs the field descriptor.
    #[must_use]
    pub const fn supports(self, kind: ValueKind) -> bool {
        match self {
            Self::Equality | Self::Range => !matches!(kind, ValueKind::Array),
            Self::ArrayOverlap => matches!(kind, ValueKind::Array),
            Self::FullText => matches!(kind, ValueKind::Text),
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// Kind of entity in the relationship graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Project,
    Student,
    Library,
}

impl NodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Student => "student",
            Self::Library => "library",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EdgeKind
// ---------------------------------------------------------------------------

/// Typed relation between two graph nodes.
///
/// ```text
/// student --authored--> project --uses--> library
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Authored,
    Uses,
}

impl EdgeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authored => "authored",
            Self::Uses => "uses",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
