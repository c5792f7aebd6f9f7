//! Project catalog repository: bulk ingestion and point lookups.

use std::collections::HashSet;

use scout_core::entities::{IngestRecord, ProjectRecord};
use serde::Serialize;

use crate::error::DatabaseError;
use crate::helpers::{encode_string_array, get_opt_string, parse_optional_datetime, parse_string_array};
use crate::service::CatalogService;

/// Titles longer than this are cut at a character boundary.
pub const MAX_TITLE_CHARS: usize = 100;

/// Outcome of one [`CatalogService::ingest`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Rows in the catalog after the run.
    pub inserted: usize,
    /// Records dropped for an empty README.
    pub skipped: usize,
    /// Records that repeated an earlier `(owner, repo)`; the later one wins.
    pub replaced: usize,
}

/// An ingest record normalized into column values.
struct ProjectRow {
    owner: String,
    repo: String,
    title: Option<String>,
    year: Option<i64>,
    semester: Option<String>,
    team_members: String,
    repository_url: Option<String>,
    libraries: String,
    readme_text: String,
    created_at: Option<String>,
}

impl ProjectRow {
    fn from_record(record: IngestRecord) -> Result<Self, DatabaseError> {
        let title: String = record.title.trim().chars().take(MAX_TITLE_CHARS).collect();

        let mut team: Vec<String> = non_blank(record.team_members);
        if team.is_empty() {
            team = non_blank(record.contributors.into_iter().map(|c| c.login).collect());
        }

        Ok(Self {
            owner: record.owner,
            repo: record.repo,
            title: (!title.is_empty()).then_some(title),
            year: record.year,
            semester: record.semester.filter(|s| !s.trim().is_empty()),
            team_members: encode_string_array(&team)?,
            repository_url: record.repository_url.filter(|s| !s.trim().is_empty()),
            libraries: encode_string_array(&non_blank(record.libraries))?,
            readme_text: record.readme_text,
            created_at: record.created_at.map(|dt| dt.to_rfc3339()),
        })
    }
}

fn non_blank(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

const PROJECT_COLUMNS: &str = "id, owner, repo, title, year, semester, team_members, \
     repository_url, libraries, created_at";

fn row_to_project(row: &libsql::Row) -> Result<ProjectRecord, DatabaseError> {
    let team = get_opt_string(row, 6)?;
    let libraries = get_opt_string(row, 8)?;
    let created_at = get_opt_string(row, 9)?;
    Ok(ProjectRecord {
        id: Some(row.get::<i64>(0)?),
        owner: row.get::<String>(1)?,
        repo: row.get::<String>(2)?,
        title: get_opt_string(row, 3)?,
        year: row.get::<Option<i64>>(4)?,
        semester: get_opt_string(row, 5)?,
        team_members: parse_string_array(team.as_deref())?,
        repository_url: get_opt_string(row, 7)?,
        libraries: parse_string_array(libraries.as_deref())?,
        created_at: parse_optional_datetime(created_at.as_deref())?,
        ..ProjectRecord::default()
    })
}

impl CatalogService {
    /// Replace the catalog with `records`.
    ///
    /// Every record is validated before anything is written; then the table
    /// is cleared and reloaded inside one transaction. Records with an empty
    /// README are skipped. When a record lists no team members, contributor
    /// logins stand in.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidRecord` for the first record that fails
    /// validation (the catalog is left untouched), or `DatabaseError` if a
    /// write fails (the transaction rolls back).
    pub async fn ingest(
        &self,
        records: Vec<serde_json::Value>,
    ) -> Result<IngestReport, DatabaseError> {
        let mut report = IngestReport::default();
        let mut rows = Vec::with_capacity(records.len());

        for (index, raw) in records.into_iter().enumerate() {
            self.validator()
                .validate(&raw)
                .map_err(|e| DatabaseError::InvalidRecord {
                    index,
                    reason: e.to_string(),
                })?;
            let record: IngestRecord =
                serde_json::from_value(raw).map_err(|e| DatabaseError::InvalidRecord {
                    index,
                    reason: e.to_string(),
                })?;
            if record.owner.trim().is_empty() || record.repo.trim().is_empty() {
                return Err(DatabaseError::InvalidRecord {
                    index,
                    reason: "owner and repo must not be blank".to_string(),
                });
            }
            if record.readme_text.trim().is_empty() {
                tracing::warn!(
                    owner = %record.owner,
                    repo = %record.repo,
                    "skipping project: empty README"
                );
                report.skipped += 1;
                continue;
            }
            rows.push(ProjectRow::from_record(record)?);
        }

        let tx = self.db().conn().transaction().await?;
        tx.execute("DELETE FROM projects", ()).await?;

        let mut seen = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !seen.insert((row.owner.as_str(), row.repo.as_str())) {
                tracing::warn!(
                    owner = %row.owner,
                    repo = %row.repo,
                    "duplicate project in input; later record wins"
                );
                report.replaced += 1;
            }
            tx.execute(
                "INSERT INTO projects
                   (owner, repo, title, year, semester, team_members, repository_url,
                    libraries, readme_text, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(owner, repo) DO UPDATE SET
                   title = ?3, year = ?4, semester = ?5, team_members = ?6,
                   repository_url = ?7, libraries = ?8, readme_text = ?9, created_at = ?10",
                libsql::params![
                    row.owner.as_str(),
                    row.repo.as_str(),
                    row.title.as_deref(),
                    row.year,
                    row.semester.as_deref(),
                    row.team_members.as_str(),
                    row.repository_url.as_deref(),
                    row.libraries.as_str(),
                    row.readme_text.as_str(),
                    row.created_at.as_deref()
                ],
            )
            .await?;
        }

        tx.commit().await?;
        report.inserted = seen.len();

        tracing::info!(
            inserted = report.inserted,
            skipped = report.skipped,
            replaced = report.replaced,
            "catalog ingest complete"
        );
        Ok(report)
    }

    /// Fetch one project by identity.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a column cannot be decoded.
    pub async fn get_project(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Option<ProjectRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE owner = ?1 AND repo = ?2"),
                libsql::params![owner, repo],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_project(&row)?)),
            None => Ok(None),
        }
    }

    /// Number of catalogued projects.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_projects(&self) -> Result<u64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT count(*) FROM projects", ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let count = row.get::<i64>(0)?;
        u64::try_from(count).map_err(|e| DatabaseError::Query(format!("bad row count: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::{sample_records, test_service};

    #[tokio::test]
    async fn ingest_roundtrip() {
        let svc = test_service().await;
        let report = svc.ingest(sample_records()).await.unwrap();
        assert_eq!(
            report,
            IngestReport {
                inserted: 2,
                skipped: 0,
                replaced: 0
            }
        );
        assert_eq!(svc.count_projects().await.unwrap(), 2);

        let p1 = svc.get_project("a", "p1").await.unwrap().unwrap();
        assert_eq!(p1.title.as_deref(), Some("Monte Carlo Traffic Simulation"));
        assert_eq!(p1.team_members, vec!["alice", "bob"]);
        assert_eq!(p1.libraries, vec!["numpy", "pandas"]);
        assert_eq!(p1.year, Some(2024));
        assert_eq!(p1.repository_url.as_deref(), Some("https://github.com/a/p1"));
        assert!(p1.created_at.is_some());
        assert!(p1.rank.is_none());
    }

    #[tokio::test]
    async fn ingest_replaces_previous_catalog() {
        let svc = test_service().await;
        svc.ingest(sample_records()).await.unwrap();

        let report = svc
            .ingest(vec![serde_json::json!({
                "owner": "c",
                "repo": "p3",
                "readme_text": "Agent-based epidemic model",
            })])
            .await
            .unwrap();

        assert_eq!(report.inserted, 1);
        assert_eq!(svc.count_projects().await.unwrap(), 1);
        assert!(svc.get_project("a", "p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_readme_is_skipped() {
        let svc = test_service().await;
        let report = svc
            .ingest(vec![
                serde_json::json!({ "owner": "a", "repo": "p1", "readme_text": "  " }),
                serde_json::json!({ "owner": "a", "repo": "p2", "readme_text": "ok" }),
            ])
            .await
            .unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.inserted, 1);
    }

    #[tokio::test]
    async fn contributors_fill_missing_team() {
        let svc = test_service().await;
        svc.ingest(vec![serde_json::json!({
            "owner": "a",
            "repo": "p1",
            "contributors": [{ "login": "carol" }, { "login": " " }, { "login": "dave" }],
            "readme_text": "Queue simulation",
        })])
        .await
        .unwrap();

        let p1 = svc.get_project("a", "p1").await.unwrap().unwrap();
        assert_eq!(p1.team_members, vec!["carol", "dave"]);
        assert_eq!(p1.title, None);
    }

    #[tokio::test]
    async fn long_titles_are_truncated() {
        let svc = test_service().await;
        let title = "é".repeat(150);
        svc.ingest(vec![serde_json::json!({
            "owner": "a",
            "repo": "p1",
            "title": title,
            "readme_text": "text",
        })])
        .await
        .unwrap();

        let p1 = svc.get_project("a", "p1").await.unwrap().unwrap();
        assert_eq!(p1.title.unwrap().chars().count(), MAX_TITLE_CHARS);
    }

    #[tokio::test]
    async fn invalid_record_leaves_catalog_untouched() {
        let svc = test_service().await;
        svc.ingest(sample_records()).await.unwrap();

        let err = svc
            .ingest(vec![
                serde_json::json!({ "owner": "c", "repo": "p3", "readme_text": "x" }),
                serde_json::json!({ "owner": "c", "team_members": "carol" }),
            ])
            .await
            .unwrap_err();

        assert!(matches!(err, DatabaseError::InvalidRecord { index: 1, .. }));
        assert_eq!(svc.count_projects().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn blank_identity_is_invalid() {
        let svc = test_service().await;
        let err = svc
            .ingest(vec![
                serde_json::json!({ "owner": " ", "repo": "p1", "readme_text": "x" }),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidRecord { index: 0, .. }));
    }

    #[tokio::test]
    async fn duplicate_identity_keeps_last() {
        let svc = test_service().await;
        let report = svc
            .ingest(vec![
                serde_json::json!({ "owner": "a", "repo": "p1", "title": "First", "readme_text": "x" }),
                serde_json::json!({ "owner": "a", "repo": "p1", "title": "Second", "readme_text": "y" }),
            ])
            .await
            .unwrap();

        assert_eq!(report.inserted, 1);
        assert_eq!(report.replaced, 1);
        let p1 = svc.get_project("a", "p1").await.unwrap().unwrap();
        assert_eq!(p1.title.as_deref(), Some("Second"));
    }

    #[tokio::test]
    async fn missing_project_is_none() {
        let svc = test_service().await;
        assert!(svc.get_project("nobody", "nothing").await.unwrap().is_none());
        assert_eq!(svc.count_projects().await.unwrap(), 0);
    }
}
