//! Metadata store configuration.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    "scout.db".to_string()
}

/// Default store round-trip timeout in milliseconds.
const fn default_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Local libSQL database file. `:memory:` is accepted for throwaway runs.
    #[serde(default = "default_path")]
    pub path: String,

    /// Upper bound on a single search round-trip.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    #[must_use]
    pub const fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}
