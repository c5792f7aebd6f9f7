use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::identity::ProjectKey;

/// One catalogued student project, as returned by search.
///
/// Only the identity columns are guaranteed to be populated: which other
/// attributes are filled depends on the fields requested by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ProjectRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub owner: String,
    pub repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    /// Member logins in README order.
    #[serde(default)]
    pub team_members: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub libraries: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Full-text relevance; present only when a full-text filter was active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<f64>,
    /// Schema fields whose storage column is not one of the attributes above.
    #[serde(default, flatten, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ProjectRecord {
    #[must_use]
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn key(&self) -> ProjectKey {
        ProjectKey::new(self.owner.clone(), self.repo.clone())
    }
}

/// A repository contributor as reported by the hosting service.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Contributor {
    pub login: String,
}

/// Enriched repository metadata handed to ingestion.
///
/// Produced by the fetch/README-extraction collaborators. `readme_text` feeds
/// the full-text index together with `title`; `contributors` is the fallback
/// source of team members when the README lists none.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IngestRecord {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub team_members: Vec<String>,
    #[serde(default)]
    pub contributors: Vec<Contributor>,
    #[serde(default, alias = "html_url")]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub libraries: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub readme_text: String,
}
