//! Shared test utilities for scout-db unit tests.

use crate::ScoutDb;
use crate::service::CatalogService;

/// In-memory service with migrations applied.
pub async fn test_service() -> CatalogService {
    let db = ScoutDb::open_local(":memory:").await.unwrap();
    CatalogService::from_db(db).unwrap()
}

/// Two enriched records sharing `bob` and `numpy`.
pub fn sample_records() -> Vec<serde_json::Value> {
    vec![
        serde_json::json!({
            "owner": "a",
            "repo": "p1",
            "title": "Monte Carlo Traffic Simulation",
            "year": 2024,
            "semester": "Fall 2024",
            "team_members": ["alice", "bob"],
            "html_url": "https://github.com/a/p1",
            "libraries": ["numpy", "pandas"],
            "created_at": "2024-09-01T12:00:00Z",
            "readme_text": "Monte Carlo simulation of urban traffic flow",
        }),
        serde_json::json!({
            "owner": "b",
            "repo": "p2",
            "title": "Queue Networks",
            "year": 2025,
            "semester": "Spring 2025",
            "team_members": ["bob"],
            "repository_url": "https://github.com/b/p2",
            "libraries": ["NumPy "],
            "readme_text": "Discrete event simulation of queue networks",
        }),
    ]
}
