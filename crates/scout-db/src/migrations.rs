//! Catalog schema setup, run on every [`ScoutDb::open_local`].
//!
//! The SQL lives in `migrations/` and is compiled in. Every statement is
//! `IF NOT EXISTS`, so reopening an existing catalog is a no-op.

use crate::ScoutDb;
use crate::error::DatabaseError;

/// `projects` table, `projects_fts` index, and its sync triggers.
const MIGRATION_001: &str = include_str!("../migrations/001_projects.sql");

impl ScoutDb {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_projects: {e}")))?;
        Ok(())
    }
}
