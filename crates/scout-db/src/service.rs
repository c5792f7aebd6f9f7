//! Service layer for catalog writes.
//!
//! `CatalogService` wraps `ScoutDb` (raw database access) and
//! `RecordValidator` (ingest contract). Repo methods live in `impl
//! CatalogService` blocks under `repos/`.

use scout_schema::RecordValidator;

use crate::ScoutDb;
use crate::error::DatabaseError;

pub struct CatalogService {
    db: ScoutDb,
    validator: RecordValidator,
}

impl CatalogService {
    /// Open a local database and build the record validator.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or the
    /// validator schema does not compile.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = ScoutDb::open_local(db_path).await?;
        Self::from_db(db)
    }

    /// Wrap an already-open database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Schema` if the validator schema does not compile.
    pub fn from_db(db: ScoutDb) -> Result<Self, DatabaseError> {
        Ok(Self {
            db,
            validator: RecordValidator::new()?,
        })
    }

    #[must_use]
    pub const fn db(&self) -> &ScoutDb {
        &self.db
    }

    #[must_use]
    pub const fn validator(&self) -> &RecordValidator {
        &self.validator
    }

    /// Give back the database handle, e.g. to hand it to a search engine.
    #[must_use]
    pub fn into_db(self) -> ScoutDb {
        self.db
    }
}
