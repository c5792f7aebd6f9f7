//! Serde shape of the declarative schema document.
//!
//! ```toml
//! [store]
//! table = "projects"
//! fts_table = "projects_fts"
//! fts_columns = ["title", "readme_text"]
//!
//! [[fields]]
//! name = "title"
//! column = "title"
//! kind = "text"
//! searchable = true
//!
//! [[filters]]
//! name = "keyword"
//! field = "title"
//! operator = "full_text"
//! enabled = true
//!
//! [[display_columns]]
//! field = "title"
//! ```
//!
//! Keys other than these sections are ignored so the same file can carry
//! presentation settings for other consumers.

use scout_core::enums::{OperatorKind, ValueKind};
use serde::{Deserialize, Serialize};

fn default_table() -> String {
    "projects".to_string()
}

fn default_fts_table() -> String {
    "projects_fts".to_string()
}

fn default_fts_columns() -> Vec<String> {
    vec!["title".to_string(), "readme_text".to_string()]
}

/// Where the catalog lives in the metadata store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreDescriptor {
    #[serde(default = "default_table")]
    pub table: String,
    /// FTS5 table indexing every `searchable` field's column.
    #[serde(default = "default_fts_table")]
    pub fts_table: String,
    /// Columns the FTS table indexes. A `searchable` field must use one.
    #[serde(default = "default_fts_columns")]
    pub fts_columns: Vec<String>,
}

impl Default for StoreDescriptor {
    fn default() -> Self {
        Self {
            table: default_table(),
            fts_table: default_fts_table(),
            fts_columns: default_fts_columns(),
        }
    }
}

/// A queryable field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub column: String,
    pub kind: ValueKind,
    /// The column is part of the full-text index.
    #[serde(default)]
    pub searchable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A filter bound to a field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FilterDescriptor {
    pub name: String,
    pub field: String,
    pub operator: OperatorKind,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Input widget hint for presentation layers (`text_input`, `dropdown`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
    /// Choices for dropdown widgets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// A result column with presentation hints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DisplayColumn {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default)]
    pub link: bool,
}

/// The whole schema document, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub store: StoreDescriptor,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub filters: Vec<FilterDescriptor>,
    #[serde(default)]
    pub display_columns: Vec<DisplayColumn>,
}

impl SchemaDocument {
    /// Parse a TOML schema document without validating it.
    ///
    /// # Errors
    ///
    /// Returns `toml::de::Error` if the text is not a well-formed document.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
