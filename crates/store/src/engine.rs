//! Storage engine wrapper.
//!
//! Provides a thin wrapper around redb with:
//! - Database lifecycle management
//! - File-backed and in-memory constructors
//! - Up-front table creation so readers never race a missing table

use std::path::Path;
use std::sync::Arc;

use redb::{Database, backends::InMemoryBackend};
use snafu::{ResultExt, Snafu};

use crate::tables::Tables;

/// Error context for engine lifecycle operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EngineError {
    /// Opening or creating the database failed.
    #[snafu(display("Failed to open store at {path}: {source}"))]
    Open {
        /// The path that failed to open.
        path: String,
        /// The underlying redb error.
        source: redb::DatabaseError,
    },

    /// Beginning the table-creation transaction failed.
    #[snafu(display("Transaction error: {source}"))]
    Transaction {
        /// The underlying redb error.
        source: redb::TransactionError,
    },

    /// Creating a table failed.
    #[snafu(display("Table error: {source}"))]
    Table {
        /// The underlying redb error.
        source: redb::TableError,
    },

    /// Committing the table-creation transaction failed.
    #[snafu(display("Commit error: {source}"))]
    Commit {
        /// The underlying redb error.
        source: redb::CommitError,
    },
}

/// Storage engine shared by all registry stores.
///
/// Cheap to clone; every clone shares the same underlying database. The
/// engine is constructed once by the process entry point and passed to the
/// stores, never fetched through ambient globals.
#[derive(Clone)]
pub struct StorageEngine {
    db: Arc<Database>,
}

impl StorageEngine {
    /// Opens or creates a file-backed database at the given path.
    ///
    /// All tables are created up front so later read transactions can open
    /// them unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Open`] if the file cannot be opened or
    /// created, or a transaction error if table creation fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let db = Database::create(path).map_err(|source| EngineError::Open {
            path: path.display().to_string(),
            source,
        })?;

        let engine = Self { db: Arc::new(db) };
        engine.create_tables()?;
        Ok(engine)
    }

    /// Creates an in-memory database, intended for tests.
    ///
    /// All data is lost when the last clone of the engine is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Open`] if the backend cannot be created, or a
    /// transaction error if table creation fails.
    pub fn open_in_memory() -> Result<Self, EngineError> {
        let db = Database::builder()
            .create_with_backend(InMemoryBackend::new())
            .map_err(|source| EngineError::Open { path: ":memory:".to_string(), source })?;

        let engine = Self { db: Arc::new(db) };
        engine.create_tables()?;
        Ok(engine)
    }

    /// Returns a clone of the shared database handle.
    pub fn db(&self) -> Arc<Database> {
        Arc::clone(&self.db)
    }

    /// Creates every table so reads never hit a missing-table error.
    fn create_tables(&self) -> Result<(), EngineError> {
        let txn = self.db.begin_write().context(TransactionSnafu)?;
        {
            txn.open_table(Tables::USERS).context(TableSnafu)?;
            txn.open_table(Tables::PASSWORDS).context(TableSnafu)?;
            txn.open_table(Tables::MENTEES).context(TableSnafu)?;
            txn.open_table(Tables::MENTEES_BY_BUDDY).context(TableSnafu)?;
            txn.open_table(Tables::MENTEE_BY_EMAIL).context(TableSnafu)?;
            txn.open_table(Tables::ASSETS).context(TableSnafu)?;
            txn.open_table(Tables::ASSETS_BY_OWNER).context(TableSnafu)?;
        }
        txn.commit().context(CommitSnafu)?;
        Ok(())
    }
}
