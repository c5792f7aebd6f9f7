//! # scout-db
//!
//! libSQL metadata store for the scout project catalog.
//!
//! Holds one `projects` table plus an FTS5 index over title and README text.
//! Ingestion replaces the whole catalog in a single transaction; search reads
//! go through `scout-search`, which borrows the connection from [`ScoutDb`].
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29) for native FTS5 and
//! `json_each`.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

pub use repos::project::IngestReport;
pub use service::CatalogService;

/// Central database handle.
pub struct ScoutDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl ScoutDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations on every open; they are idempotent.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let scout_db = Self { db, conn };
        scout_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(scout_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}

impl std::fmt::Debug for ScoutDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoutDb").finish_non_exhaustive()
    }
}
