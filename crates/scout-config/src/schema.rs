//! Schema document location.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SchemaConfig {
    /// TOML schema document. Empty means the built-in schema.
    #[serde(default)]
    pub path: String,
}

impl SchemaConfig {
    /// The configured schema file, if any.
    #[must_use]
    pub fn custom_path(&self) -> Option<PathBuf> {
        let trimmed = self.path.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}
