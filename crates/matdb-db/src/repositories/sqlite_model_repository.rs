//! `SQLite` implementation of the `ModelRepository` trait.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqliteConnection;
use tracing::info;

use matdb_core::utils::{validate_name, validate_uuid};
use matdb_core::{
    LibraryEntry, MaterialDbError, Model, ModelProperty, ModelRepository, StoredModel,
};

use super::error::{StoreResult, failed};
use super::folders::{path_of, resolve_path};
use super::libraries::{library_by_id, require_library, require_writable, require_writable_id};
use super::row_mappers::{
    EntryRow, ModelRow, PropertyRow, SELECT_MODEL, SELECT_MODEL_PROPERTIES,
    SELECT_MODEL_PROPERTY_COLUMNS,
};
use crate::connection::Database;

const LIST_MODELS: &str = "SELECT m.model_id AS uuid, m.model_name AS name, fp.path AS path \
     FROM model m \
     LEFT JOIN folder_path fp ON fp.folder_id = m.folder_id \
     WHERE m.library_id = ? \
     ORDER BY fp.path, m.model_name";

/// Binds `(start, target)`: whether `target` is `start` or one of its ancestors.
/// `UNION` deduplicates, so stored cycles terminate.
const REACHES_ANCESTOR: &str = "WITH RECURSIVE ancestor (id) AS ( \
         SELECT ? \
         UNION \
         SELECT mi.inherits_id FROM model_inheritance mi JOIN ancestor a ON mi.model_id = a.id \
     ) \
     SELECT EXISTS (SELECT 1 FROM ancestor WHERE id = ?)";

// ─────────────────────────────────────────────────────────────────────────────
// Row helpers, shared with bulk load
// ─────────────────────────────────────────────────────────────────────────────

/// Read a model with its inheritance edges, properties and columns.
///
/// Column rows are queried only once the property list is fully fetched.
pub(crate) async fn fetch_model(
    conn: &mut SqliteConnection,
    uuid: &str,
) -> StoreResult<StoredModel> {
    let row = sqlx::query_as::<_, ModelRow>(SELECT_MODEL)
        .bind(uuid)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| MaterialDbError::ModelNotFound(uuid.to_string()))?;

    let library = library_by_id(conn, row.library_id).await?.into_library();
    let path = path_of(conn, row.folder_id).await?;

    let inherits: Vec<String> =
        sqlx::query_scalar("SELECT inherits_id FROM model_inheritance WHERE model_id = ?")
            .bind(uuid)
            .fetch_all(&mut *conn)
            .await?;

    let property_rows = sqlx::query_as::<_, PropertyRow>(SELECT_MODEL_PROPERTIES)
        .bind(uuid)
        .fetch_all(&mut *conn)
        .await?;

    let mut properties = Vec::with_capacity(property_rows.len());
    for property in property_rows {
        let columns = sqlx::query_as::<_, PropertyRow>(SELECT_MODEL_PROPERTY_COLUMNS)
            .bind(property.model_property_id)
            .fetch_all(&mut *conn)
            .await?
            .into_iter()
            .map(|c| c.into_property(Vec::new()))
            .collect();
        properties.push(property.into_property(columns));
    }

    Ok(StoredModel {
        library,
        path,
        object: row.into_model(inherits, properties)?,
    })
}

pub(crate) async fn model_exists(conn: &mut SqliteConnection, uuid: &str) -> StoreResult<bool> {
    let exists = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM model WHERE model_id = ?)")
        .bind(uuid)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

/// Library id of a stored model.
async fn model_library(conn: &mut SqliteConnection, uuid: &str) -> StoreResult<i64> {
    let id: Option<i64> = sqlx::query_scalar("SELECT library_id FROM model WHERE model_id = ?")
        .bind(uuid)
        .fetch_optional(&mut *conn)
        .await?;
    id.ok_or_else(|| MaterialDbError::ModelNotFound(uuid.to_string()).into())
}

/// Reject `parents` if any of them is `uuid` or descends from it.
pub(crate) async fn check_cycle(
    conn: &mut SqliteConnection,
    uuid: &str,
    parents: &BTreeSet<String>,
) -> StoreResult<()> {
    for parent in parents {
        let reaches: bool = sqlx::query_scalar(REACHES_ANCESTOR)
            .bind(parent)
            .bind(uuid)
            .fetch_one(&mut *conn)
            .await?;
        if reaches {
            return Err(MaterialDbError::InheritanceCycle {
                model: uuid.to_string(),
                parent: parent.clone(),
            }
            .into());
        }
    }
    Ok(())
}

pub(crate) async fn insert_property(
    conn: &mut SqliteConnection,
    model_uuid: &str,
    property: &ModelProperty,
) -> StoreResult<()> {
    let property_id = sqlx::query(
        "INSERT INTO model_property (model_id, model_property_name, model_property_display_name, \
             model_property_type, model_property_units, model_property_url, \
             model_property_description) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(model_uuid)
    .bind(&property.name)
    .bind(&property.display_name)
    .bind(property.property_type.as_str())
    .bind(&property.units)
    .bind(&property.url)
    .bind(&property.description)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    for column in &property.columns {
        sqlx::query(
            "INSERT INTO model_property_column (model_property_id, model_property_name, \
                 model_property_display_name, model_property_type, model_property_units, \
                 model_property_url, model_property_description) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(property_id)
        .bind(&column.name)
        .bind(&column.display_name)
        .bind(column.property_type.as_str())
        .bind(&column.units)
        .bind(&column.url)
        .bind(&column.description)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_edges(conn: &mut SqliteConnection, model: &Model) -> StoreResult<()> {
    for parent in &model.inherits {
        sqlx::query("INSERT INTO model_inheritance (model_id, inherits_id) VALUES (?, ?)")
            .bind(&model.uuid)
            .bind(parent)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Insert the base row, inheritance edges and own properties.
pub(crate) async fn insert_model_rows(
    conn: &mut SqliteConnection,
    library_id: i64,
    folder_id: Option<i64>,
    model: &Model,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO model (model_id, library_id, folder_id, model_type, model_name, \
             model_url, model_description, model_doi) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&model.uuid)
    .bind(library_id)
    .bind(folder_id)
    .bind(model.model_type.as_str())
    .bind(&model.name)
    .bind(&model.url)
    .bind(&model.description)
    .bind(&model.doi)
    .execute(&mut *conn)
    .await?;

    insert_edges(conn, model).await?;
    for property in model.own_properties() {
        insert_property(conn, &model.uuid, property).await?;
    }
    Ok(())
}

fn validate_model(model: &Model) -> StoreResult<()> {
    validate_uuid(&model.uuid)?;
    validate_name("model", &model.name)?;
    for parent in &model.inherits {
        validate_uuid(parent)?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository
// ─────────────────────────────────────────────────────────────────────────────

/// `SQLite` implementation of the `ModelRepository` trait.
pub struct SqliteModelRepository {
    db: Arc<Database>,
}

impl SqliteModelRepository {
    pub const fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn list(&self, library: &str) -> StoreResult<Vec<LibraryEntry>> {
        let mut conn = self.db.acquire().await?;
        let lib = require_library(&mut conn, library).await?;
        let rows = sqlx::query_as::<_, EntryRow>(LIST_MODELS)
            .bind(lib.library_id)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows.into_iter().map(EntryRow::into_entry).collect())
    }

    async fn get(&self, uuid: &str) -> StoreResult<StoredModel> {
        let mut conn = self.db.acquire().await?;
        fetch_model(&mut conn, uuid).await
    }

    async fn create(&self, library: &str, path: &str, model: &Model) -> StoreResult<()> {
        validate_model(model)?;
        let mut tx = self.db.begin().await?;

        let lib = require_writable(&mut tx, library).await?;
        if model_exists(&mut tx, &model.uuid).await? {
            return Err(MaterialDbError::ModelExists(model.uuid.clone()).into());
        }
        check_cycle(&mut tx, &model.uuid, &model.inherits).await?;

        let folder = resolve_path(&mut tx, lib.library_id, path).await?;
        insert_model_rows(&mut tx, lib.library_id, folder, model).await?;
        tx.commit().await?;

        info!(uuid = %model.uuid, library, path, "Model created");
        Ok(())
    }

    async fn update(&self, library: &str, path: &str, model: &Model) -> StoreResult<()> {
        validate_model(model)?;
        let mut tx = self.db.begin().await?;

        let lib = require_writable(&mut tx, library).await?;
        let current = model_library(&mut tx, &model.uuid).await?;
        if current != lib.library_id {
            require_writable_id(&mut tx, current).await?;
        }
        check_cycle(&mut tx, &model.uuid, &model.inherits).await?;
        let folder = resolve_path(&mut tx, lib.library_id, path).await?;

        sqlx::query(
            "UPDATE model SET library_id = ?, folder_id = ?, model_type = ?, model_name = ?, \
                 model_url = ?, model_description = ?, model_doi = ? \
             WHERE model_id = ?",
        )
        .bind(lib.library_id)
        .bind(folder)
        .bind(model.model_type.as_str())
        .bind(&model.name)
        .bind(&model.url)
        .bind(&model.description)
        .bind(&model.doi)
        .bind(&model.uuid)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM model_inheritance WHERE model_id = ?")
            .bind(&model.uuid)
            .execute(&mut *tx)
            .await?;
        insert_edges(&mut tx, model).await?;

        // Existing property rows are kept as they are; only the set changes.
        let stored: HashSet<String> =
            sqlx::query_scalar("SELECT model_property_name FROM model_property WHERE model_id = ?")
                .bind(&model.uuid)
                .fetch_all(&mut *tx)
                .await?
                .into_iter()
                .collect();
        let wanted: HashSet<&str> = model.own_properties().map(|p| p.name.as_str()).collect();

        for name in stored.iter().filter(|n| !wanted.contains(n.as_str())) {
            sqlx::query("DELETE FROM model_property WHERE model_id = ? AND model_property_name = ?")
                .bind(&model.uuid)
                .bind(name)
                .execute(&mut *tx)
                .await?;
        }
        for property in model.own_properties().filter(|p| !stored.contains(&p.name)) {
            insert_property(&mut tx, &model.uuid, property).await?;
        }

        tx.commit().await?;
        info!(uuid = %model.uuid, library, "Model updated");
        Ok(())
    }

    async fn set_path(&self, library: &str, path: &str, uuid: &str) -> StoreResult<()> {
        let mut tx = self.db.begin().await?;
        let lib = require_writable(&mut tx, library).await?;
        if model_library(&mut tx, uuid).await? != lib.library_id {
            return Err(MaterialDbError::ModelUpdate(format!(
                "model {uuid} is not in library '{library}'"
            ))
            .into());
        }

        let folder = resolve_path(&mut tx, lib.library_id, path).await?;
        sqlx::query("UPDATE model SET folder_id = ? WHERE model_id = ?")
            .bind(folder)
            .bind(uuid)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn rename(&self, library: &str, new_name: &str, uuid: &str) -> StoreResult<()> {
        validate_name("model", new_name)?;
        let mut tx = self.db.begin().await?;
        let lib = require_writable(&mut tx, library).await?;
        if model_library(&mut tx, uuid).await? != lib.library_id {
            return Err(MaterialDbError::Rename(format!(
                "model {uuid} is not in library '{library}'"
            ))
            .into());
        }

        sqlx::query("UPDATE model SET model_name = ? WHERE model_id = ?")
            .bind(new_name)
            .bind(uuid)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn relocate(&self, library: &str, new_path: &str, uuid: &str) -> StoreResult<()> {
        let mut tx = self.db.begin().await?;
        let destination = require_writable(&mut tx, library).await?;
        let current = model_library(&mut tx, uuid).await?;
        require_writable_id(&mut tx, current).await?;

        let folder = resolve_path(&mut tx, destination.library_id, new_path).await?;
        sqlx::query("UPDATE model SET library_id = ?, folder_id = ? WHERE model_id = ?")
            .bind(destination.library_id)
            .bind(folder)
            .bind(uuid)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(uuid, library, path = new_path, "Model moved");
        Ok(())
    }

    async fn remove(&self, uuid: &str) -> StoreResult<()> {
        let mut tx = self.db.begin().await?;
        let current = model_library(&mut tx, uuid).await?;
        require_writable_id(&mut tx, current).await?;

        sqlx::query("DELETE FROM model WHERE model_id = ?")
            .bind(uuid)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(uuid, "Model removed");
        Ok(())
    }
}

#[async_trait]
impl ModelRepository for SqliteModelRepository {
    async fn list_models(&self, library: &str) -> Result<Vec<LibraryEntry>, MaterialDbError> {
        self.list(library)
            .await
            .map_err(failed("list_models", MaterialDbError::Storage))
    }

    async fn get_model(&self, uuid: &str) -> Result<StoredModel, MaterialDbError> {
        self.get(uuid)
            .await
            .map_err(failed("get_model", MaterialDbError::Storage))
    }

    async fn create_model(
        &self,
        library: &str,
        path: &str,
        model: &Model,
    ) -> Result<(), MaterialDbError> {
        self.create(library, path, model)
            .await
            .map_err(failed("create_model", MaterialDbError::ModelCreation))
    }

    async fn update_model(
        &self,
        library: &str,
        path: &str,
        model: &Model,
    ) -> Result<(), MaterialDbError> {
        self.update(library, path, model)
            .await
            .map_err(failed("update_model", MaterialDbError::ModelUpdate))
    }

    async fn set_model_path(
        &self,
        library: &str,
        path: &str,
        uuid: &str,
    ) -> Result<(), MaterialDbError> {
        self.set_path(library, path, uuid)
            .await
            .map_err(failed("set_model_path", MaterialDbError::ModelUpdate))
    }

    async fn rename_model(
        &self,
        library: &str,
        new_name: &str,
        uuid: &str,
    ) -> Result<(), MaterialDbError> {
        self.rename(library, new_name, uuid)
            .await
            .map_err(failed("rename_model", MaterialDbError::Rename))
    }

    async fn move_model(
        &self,
        library: &str,
        new_path: &str,
        uuid: &str,
    ) -> Result<(), MaterialDbError> {
        self.relocate(library, new_path, uuid)
            .await
            .map_err(failed("move_model", MaterialDbError::ModelUpdate))
    }

    async fn remove_model(&self, uuid: &str) -> Result<(), MaterialDbError> {
        self.remove(uuid)
            .await
            .map_err(failed("remove_model", MaterialDbError::Delete))
    }
}
