//! Composition utilities for building the repository set with `SQLite` backends.
//!
//! This module provides factory functions for wiring up the repositories
//! against one shared [`Database`]. It is focused purely on construction
//! and should not contain any domain logic.

use std::sync::Arc;

use matdb_core::{MaterialManager, Repos};

use crate::connection::Database;
use crate::repositories::{
    SqliteBulkLoadRepository, SqliteFolderRepository, SqliteLibraryRepository,
    SqliteMaterialRepository, SqliteModelRepository,
};

/// Factory for creating repository instances with `SQLite` backends.
pub struct StoreFactory;

impl StoreFactory {
    /// Build all `SQLite` repositories over one database.
    ///
    /// Returns a `Repos` struct from `matdb-core` containing
    /// trait-object-wrapped repositories.
    pub fn build_repos(db: &Arc<Database>) -> Repos {
        Repos::new(
            Arc::new(SqliteLibraryRepository::new(Arc::clone(db))),
            Arc::new(SqliteFolderRepository::new(Arc::clone(db))),
            Arc::new(SqliteModelRepository::new(Arc::clone(db))),
            Arc::new(SqliteMaterialRepository::new(Arc::clone(db))),
            Arc::new(SqliteBulkLoadRepository::new(Arc::clone(db))),
        )
    }

    /// Build a [`MaterialManager`] in one step. Equivalent to:
    ///
    /// ```ignore
    /// let repos = StoreFactory::build_repos(&db);
    /// let manager = MaterialManager::new(repos);
    /// ```
    pub fn build_manager(db: &Arc<Database>) -> MaterialManager {
        MaterialManager::new(Self::build_repos(db))
    }
}

/// Test database helper for integration tests.
///
/// Provides an in-memory database with the full production schema applied.
#[cfg(any(test, feature = "test-utils"))]
pub struct TestDb {
    db: Arc<Database>,
}

#[cfg(any(test, feature = "test-utils"))]
impl TestDb {
    /// Create a new in-memory test database with full schema.
    pub async fn new() -> anyhow::Result<Self> {
        let db = crate::setup::setup_test_database().await?;
        Ok(Self { db: Arc::new(db) })
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    pub fn repos(&self) -> Repos {
        StoreFactory::build_repos(&self.db)
    }

    pub fn manager(&self) -> MaterialManager {
        StoreFactory::build_manager(&self.db)
    }

    pub fn library_repository(&self) -> SqliteLibraryRepository {
        SqliteLibraryRepository::new(Arc::clone(&self.db))
    }

    pub fn folder_repository(&self) -> SqliteFolderRepository {
        SqliteFolderRepository::new(Arc::clone(&self.db))
    }

    pub fn model_repository(&self) -> SqliteModelRepository {
        SqliteModelRepository::new(Arc::clone(&self.db))
    }

    pub fn material_repository(&self) -> SqliteMaterialRepository {
        SqliteMaterialRepository::new(Arc::clone(&self.db))
    }

    pub fn bulk_repository(&self) -> SqliteBulkLoadRepository {
        SqliteBulkLoadRepository::new(Arc::clone(&self.db))
    }
}
