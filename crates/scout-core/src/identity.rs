use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Storage columns that make up a project's identity, in select order.
pub const IDENTITY_COLUMNS: [&str; 2] = ["owner", "repo"];

/// Globally unique identity of a project repository.
///
/// Displays as `owner/repo`, which is also the graph node key for projects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct ProjectKey {
    pub owner: String,
    pub repo: String,
}

impl ProjectKey {
    #[must_use]
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
