//! `SQLite` implementation of the `LibraryRepository` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use matdb_core::utils::validate_name;
use matdb_core::{Library, LibraryRepository, MaterialDbError};

use super::error::{StoreResult, failed};
use super::libraries::{library_by_name, require_library};
use super::row_mappers::LibraryRow;
use crate::connection::Database;

const LIST_LIBRARIES: &str = "SELECT library_id, library_name, library_icon, library_read_only \
     FROM library ORDER BY library_name";

const LIST_LIBRARIES_WITH_MODELS: &str = "SELECT library_id, library_name, library_icon, library_read_only \
     FROM library l \
     WHERE EXISTS (SELECT 1 FROM model m WHERE m.library_id = l.library_id) \
     ORDER BY library_name";

const LIST_LIBRARIES_WITH_MATERIALS: &str = "SELECT library_id, library_name, library_icon, library_read_only \
     FROM library l \
     WHERE EXISTS (SELECT 1 FROM material m WHERE m.library_id = l.library_id) \
     ORDER BY library_name";

/// `SQLite` implementation of the `LibraryRepository` trait.
pub struct SqliteLibraryRepository {
    db: Arc<Database>,
}

impl SqliteLibraryRepository {
    pub const fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn list(&self, sql: &'static str) -> StoreResult<Vec<Library>> {
        let mut conn = self.db.acquire().await?;
        let rows = sqlx::query_as::<_, LibraryRow>(sql)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows.into_iter().map(LibraryRow::into_library).collect())
    }

    async fn get(&self, name: &str) -> StoreResult<Library> {
        let mut conn = self.db.acquire().await?;
        Ok(require_library(&mut conn, name).await?.into_library())
    }

    async fn create(&self, name: &str, icon: Option<&[u8]>, read_only: bool) -> StoreResult<()> {
        validate_name("library", name)?;
        let mut tx = self.db.begin().await?;

        if let Some(existing) = library_by_name(&mut tx, name).await? {
            if existing.into_library().matches(icon, read_only) {
                return Ok(());
            }
            return Err(MaterialDbError::LibraryCreation(format!(
                "library '{name}' already exists with a different icon or read-only flag"
            ))
            .into());
        }

        sqlx::query(
            "INSERT INTO library (library_name, library_icon, library_read_only) VALUES (?, ?, ?)",
        )
        .bind(name)
        .bind(icon.filter(|i| !i.is_empty()))
        .bind(read_only)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        info!(library = name, read_only, "Library created");
        Ok(())
    }

    async fn rename(&self, old_name: &str, new_name: &str) -> StoreResult<()> {
        validate_name("library", new_name)?;
        let mut tx = self.db.begin().await?;

        let library = require_library(&mut tx, old_name).await?;
        if old_name == new_name {
            return Ok(());
        }
        if library_by_name(&mut tx, new_name).await?.is_some() {
            return Err(
                MaterialDbError::Rename(format!("library '{new_name}' already exists")).into(),
            );
        }

        sqlx::query("UPDATE library SET library_name = ? WHERE library_id = ?")
            .bind(new_name)
            .bind(library.library_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(from = old_name, to = new_name, "Library renamed");
        Ok(())
    }

    async fn set_icon(&self, name: &str, icon: Option<&[u8]>) -> StoreResult<()> {
        let mut tx = self.db.begin().await?;
        let library = require_library(&mut tx, name).await?;

        sqlx::query("UPDATE library SET library_icon = ? WHERE library_id = ?")
            .bind(icon.filter(|i| !i.is_empty()))
            .bind(library.library_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn remove(&self, name: &str) -> StoreResult<()> {
        let mut tx = self.db.begin().await?;
        let library = require_library(&mut tx, name).await?;

        sqlx::query("DELETE FROM library WHERE library_id = ?")
            .bind(library.library_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(library = name, "Library removed");
        Ok(())
    }
}

#[async_trait]
impl LibraryRepository for SqliteLibraryRepository {
    async fn list_libraries(&self) -> Result<Vec<Library>, MaterialDbError> {
        self.list(LIST_LIBRARIES)
            .await
            .map_err(failed("list_libraries", MaterialDbError::Storage))
    }

    async fn list_libraries_with_models(&self) -> Result<Vec<Library>, MaterialDbError> {
        self.list(LIST_LIBRARIES_WITH_MODELS)
            .await
            .map_err(failed("list_libraries_with_models", MaterialDbError::Storage))
    }

    async fn list_libraries_with_materials(&self) -> Result<Vec<Library>, MaterialDbError> {
        self.list(LIST_LIBRARIES_WITH_MATERIALS)
            .await
            .map_err(failed("list_libraries_with_materials", MaterialDbError::Storage))
    }

    async fn get_library(&self, name: &str) -> Result<Library, MaterialDbError> {
        self.get(name)
            .await
            .map_err(failed("get_library", MaterialDbError::Storage))
    }

    async fn create_library(
        &self,
        name: &str,
        icon: Option<&[u8]>,
        read_only: bool,
    ) -> Result<(), MaterialDbError> {
        self.create(name, icon, read_only)
            .await
            .map_err(failed("create_library", MaterialDbError::LibraryCreation))
    }

    async fn rename_library(&self, old_name: &str, new_name: &str) -> Result<(), MaterialDbError> {
        self.rename(old_name, new_name)
            .await
            .map_err(failed("rename_library", MaterialDbError::Rename))
    }

    async fn change_icon(&self, name: &str, icon: Option<&[u8]>) -> Result<(), MaterialDbError> {
        self.set_icon(name, icon)
            .await
            .map_err(failed("change_icon", MaterialDbError::Icon))
    }

    async fn remove_library(&self, name: &str) -> Result<(), MaterialDbError> {
        self.remove(name)
            .await
            .map_err(failed("remove_library", MaterialDbError::Delete))
    }
}
