//! `SQLite` implementation of the `FolderRepository` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use matdb_core::{FolderRepository, MaterialDbError};

use super::error::{StoreResult, failed};
use super::folders::{delete_recursive, list_paths, rename_path, resolve_path};
use super::libraries::{require_library, require_writable};
use crate::connection::Database;

pub struct SqliteFolderRepository {
    db: Arc<Database>,
}

impl SqliteFolderRepository {
    pub const fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn list(&self, library: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.db.acquire().await?;
        let lib = require_library(&mut conn, library).await?;
        list_paths(&mut conn, lib.library_id).await
    }

    async fn create(&self, library: &str, path: &str) -> StoreResult<()> {
        let mut tx = self.db.begin().await?;
        let lib = require_writable(&mut tx, library).await?;
        let folder = resolve_path(&mut tx, lib.library_id, path).await?;
        tx.commit().await?;
        debug!(library, path, ?folder, "Folder resolved");
        Ok(())
    }

    async fn rename(&self, library: &str, old_path: &str, new_path: &str) -> StoreResult<()> {
        let mut tx = self.db.begin().await?;
        let lib = require_writable(&mut tx, library).await?;
        rename_path(&mut tx, lib.library_id, old_path, new_path).await?;
        tx.commit().await?;
        info!(library, from = old_path, to = new_path, "Folder renamed");
        Ok(())
    }

    async fn delete(&self, library: &str, path: &str) -> StoreResult<()> {
        let mut tx = self.db.begin().await?;
        let lib = require_writable(&mut tx, library).await?;
        delete_recursive(&mut tx, lib.library_id, path).await?;
        tx.commit().await?;
        info!(library, path, "Folder deleted");
        Ok(())
    }
}

#[async_trait]
impl FolderRepository for SqliteFolderRepository {
    async fn list_folders(&self, library: &str) -> Result<Vec<String>, MaterialDbError> {
        self.list(library)
            .await
            .map_err(failed("list_folders", MaterialDbError::Storage))
    }

    async fn create_folder(&self, library: &str, path: &str) -> Result<(), MaterialDbError> {
        self.create(library, path)
            .await
            .map_err(failed("create_folder", MaterialDbError::FolderCreation))
    }

    async fn rename_folder(
        &self,
        library: &str,
        old_path: &str,
        new_path: &str,
    ) -> Result<(), MaterialDbError> {
        self.rename(library, old_path, new_path)
            .await
            .map_err(failed("rename_folder", MaterialDbError::Rename))
    }

    async fn delete_folder_recursive(
        &self,
        library: &str,
        path: &str,
    ) -> Result<(), MaterialDbError> {
        self.delete(library, path)
            .await
            .map_err(failed("delete_folder_recursive", MaterialDbError::Delete))
    }
}
