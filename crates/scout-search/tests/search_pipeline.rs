//! End to end: ingest into an on-disk catalog, search it through a custom
//! schema file, and graph the results.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use scout_core::enums::NodeKind;
use scout_db::{CatalogService, ScoutDb};
use scout_schema::SchemaRegistry;
use scout_search::{ExecutorLimits, FilterInput, FilterValue, SearchEngine, SearchError};

const SCHEMA: &str = r#"
[[fields]]
name = "owner"
column = "owner"
kind = "text"

[[fields]]
name = "repo"
column = "repo"
kind = "text"

[[fields]]
name = "title"
column = "title"
kind = "text"
searchable = true

[[fields]]
name = "members"
column = "team_members"
kind = "array"

[[fields]]
name = "libraries"
column = "libraries"
kind = "array"

[[fields]]
name = "year"
column = "year"
kind = "integer"

[[filters]]
name = "q"
field = "title"
operator = "full_text"
enabled = true

[[filters]]
name = "uses"
field = "libraries"
operator = "array_overlap"
enabled = true

[[filters]]
name = "year"
field = "year"
operator = "range"
enabled = true

[[display_columns]]
field = "title"

[[display_columns]]
field = "members"
"#;

fn records() -> Vec<serde_json::Value> {
    let mut out = Vec::new();
    for (i, (title, libs)) in [
        ("Monte Carlo Traffic", vec!["numpy", "pandas"]),
        ("Monte Carlo Epidemics", vec!["numpy"]),
        ("Queue Networks", vec!["simpy"]),
        ("Traffic Light Scheduling", vec!["networkx"]),
    ]
    .into_iter()
    .enumerate()
    {
        out.push(serde_json::json!({
            "owner": "cs-lab",
            "repo": format!("project-{i}"),
            "title": title,
            "year": 2021 + i64::try_from(i).unwrap(),
            "contributors": [{ "login": format!("student-{i}") }, { "login": "ta" }],
            "libraries": libs,
            "readme_text": format!("{title} course project"),
        }));
    }
    out
}

async fn open_catalog(dir: &tempfile::TempDir) -> ScoutDb {
    let path = dir.path().join("catalog.db");
    let svc = CatalogService::new_local(path.to_str().unwrap()).await.unwrap();
    svc.ingest(records()).await.unwrap();
    svc.into_db()
}

fn registry(dir: &tempfile::TempDir) -> Arc<SchemaRegistry> {
    let path = dir.path().join("schema.toml");
    std::fs::write(&path, SCHEMA).unwrap();
    Arc::new(SchemaRegistry::from_path(&path).unwrap())
}

#[tokio::test]
async fn keyword_and_overlap_combine() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_catalog(&dir).await;
    let engine = SearchEngine::new(registry(&dir), &db, ExecutorLimits::default());

    let input = FilterInput::new()
        .with("q", "monte carlo")
        .with("uses", "pandas, simpy");
    let found = engine.search(&input, &[], 10).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].repo, "project-0");
    assert_eq!(found[0].team_members, vec!["student-0", "ta"]);
    assert!(found[0].rank.is_some());
    // Only display columns were requested.
    assert!(found[0].libraries.is_empty());
}

#[tokio::test]
async fn range_limits_and_ordering() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_catalog(&dir).await;
    let engine = SearchEngine::new(registry(&dir), &db, ExecutorLimits::default());

    let input = FilterInput::new().with("year", FilterValue::between("2022", "2024"));
    let found = engine.search(&input, &["year"], 2).await.unwrap();
    let repos: Vec<&str> = found.iter().map(|r| r.repo.as_str()).collect();
    assert_eq!(repos, vec!["project-1", "project-2"]);
    assert_eq!(found[0].year, Some(2022));
}

#[tokio::test]
async fn graph_links_shared_contributor() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_catalog(&dir).await;
    let engine = SearchEngine::new(registry(&dir), &db, ExecutorLimits::default());

    let graph = engine.graph(&FilterInput::new(), 100).await.unwrap();
    let summary = graph.analyze(1);
    assert_eq!(summary.projects, 4);
    assert_eq!(summary.students, 5);
    assert_eq!(summary.components, 1);
    assert_eq!(summary.top_libraries[0].library, "numpy");
    assert!(graph.node(NodeKind::Student, "ta").is_some());

    let json = serde_json::to_value(graph.to_graph()).unwrap();
    assert_eq!(json["nodes"][0]["kind"], "project");
    assert_eq!(json["edges"][0]["kind"], "authored");
}

#[tokio::test]
async fn disabled_schema_filters_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_catalog(&dir).await;
    let engine = SearchEngine::new(registry(&dir), &db, ExecutorLimits::default());

    let err = engine
        .search(&FilterInput::new().with("keyword", "traffic"), &[], 10)
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Query(_)));
}
