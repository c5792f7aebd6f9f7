//! Search paging configuration.

use serde::{Deserialize, Serialize};

const fn default_page_size() -> u32 {
    30
}

const fn default_max_rows() -> u32 {
    10_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Rows returned when the caller gives no explicit limit.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Hard cap on rows any single search may return.
    #[serde(default = "default_max_rows")]
    pub max_rows: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_rows: default_max_rows(),
        }
    }
}
