//! `SQLite` implementation of the `MaterialRepository` trait.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::{info, warn};

use matdb_core::utils::{validate_name, validate_uuid};
use matdb_core::{
    LibraryEntry, Material, MaterialDbError, MaterialFilter, MaterialFilterOptions,
    MaterialRepository, ModelType, StoredMaterial,
};

use super::codec::{read_values, write_value};
use super::error::{StoreResult, failed};
use super::folders::{path_of_recursive, resolve_path};
use super::libraries::{library_by_id, require_library, require_writable, require_writable_id};
use super::row_mappers::{EntryRow, MaterialLinks, MaterialRow, SELECT_MATERIAL};
use crate::connection::Database;

// ─────────────────────────────────────────────────────────────────────────────
// Row helpers, shared with bulk load
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) async fn fetch_material(
    conn: &mut SqliteConnection,
    uuid: &str,
) -> StoreResult<StoredMaterial> {
    let row = sqlx::query_as::<_, MaterialRow>(SELECT_MATERIAL)
        .bind(uuid)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| MaterialDbError::MaterialNotFound(uuid.to_string()))?;

    let library = library_by_id(conn, row.library_id).await?.into_library();
    let path = path_of_recursive(conn, row.folder_id).await?;

    let tags: Vec<String> = sqlx::query_scalar(
        "SELECT t.material_tag_name FROM material_tag_mapping tm \
         JOIN material_tag t ON t.material_tag_id = tm.material_tag_id \
         WHERE tm.material_id = ?",
    )
    .bind(uuid)
    .fetch_all(&mut *conn)
    .await?;

    // Model links are split by the linked model's own type.
    let linked: Vec<(String, String)> = sqlx::query_as(
        "SELECT mm.model_id, m.model_type FROM material_models mm \
         JOIN model m ON m.model_id = mm.model_id \
         WHERE mm.material_id = ?",
    )
    .bind(uuid)
    .fetch_all(&mut *conn)
    .await?;

    let mut links = MaterialLinks {
        tags,
        ..MaterialLinks::default()
    };
    for (model_uuid, model_type) in linked {
        match ModelType::parse(&model_type) {
            Some(ModelType::Physical) => links.physical_models.push(model_uuid),
            Some(ModelType::Appearance) => links.appearance_models.push(model_uuid),
            None => warn!(material = uuid, model = %model_uuid, %model_type, "Unknown model type"),
        }
    }
    links.values = read_values(conn, uuid).await?;

    Ok(StoredMaterial {
        library,
        path,
        object: row.into_material(links),
    })
}

pub(crate) async fn material_exists(conn: &mut SqliteConnection, uuid: &str) -> StoreResult<bool> {
    let exists =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM material WHERE material_id = ?)")
            .bind(uuid)
            .fetch_one(&mut *conn)
            .await?;
    Ok(exists)
}

async fn material_library(conn: &mut SqliteConnection, uuid: &str) -> StoreResult<i64> {
    let id: Option<i64> =
        sqlx::query_scalar("SELECT library_id FROM material WHERE material_id = ?")
            .bind(uuid)
            .fetch_optional(&mut *conn)
            .await?;
    id.ok_or_else(|| MaterialDbError::MaterialNotFound(uuid.to_string()).into())
}

/// Create-or-reuse each tag by name and link it.
async fn link_tags(
    conn: &mut SqliteConnection,
    uuid: &str,
    tags: &BTreeSet<String>,
) -> StoreResult<()> {
    for tag in tags {
        sqlx::query(
            "INSERT INTO material_tag (material_tag_name) VALUES (?) \
             ON CONFLICT (material_tag_name) DO NOTHING",
        )
        .bind(tag)
        .execute(&mut *conn)
        .await?;

        let tag_id: i64 =
            sqlx::query_scalar("SELECT material_tag_id FROM material_tag WHERE material_tag_name = ?")
                .bind(tag)
                .fetch_one(&mut *conn)
                .await?;

        sqlx::query(
            "INSERT OR IGNORE INTO material_tag_mapping (material_id, material_tag_id) VALUES (?, ?)",
        )
        .bind(uuid)
        .bind(tag_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn link_models(conn: &mut SqliteConnection, material: &Material) -> StoreResult<()> {
    for model_uuid in material.model_uuids() {
        sqlx::query("INSERT OR IGNORE INTO material_models (material_id, model_id) VALUES (?, ?)")
            .bind(&material.uuid)
            .bind(model_uuid)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn write_values(conn: &mut SqliteConnection, material: &Material) -> StoreResult<()> {
    for (name, value) in &material.values {
        write_value(conn, &material.uuid, name, value).await?;
    }
    Ok(())
}

/// Insert the base row, tags, model links and property values.
pub(crate) async fn insert_material_rows(
    conn: &mut SqliteConnection,
    library_id: i64,
    folder_id: Option<i64>,
    material: &Material,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO material (material_id, library_id, folder_id, material_name, \
             material_author, material_license, material_parent_uuid, material_description, \
             material_url, material_reference) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&material.uuid)
    .bind(library_id)
    .bind(folder_id)
    .bind(&material.name)
    .bind(&material.author)
    .bind(&material.license)
    .bind(&material.parent)
    .bind(&material.description)
    .bind(&material.url)
    .bind(&material.reference)
    .execute(&mut *conn)
    .await?;

    link_tags(conn, &material.uuid, &material.tags).await?;
    link_models(conn, material).await?;
    write_values(conn, material).await
}

fn validate_material(material: &Material) -> StoreResult<()> {
    validate_uuid(&material.uuid)?;
    validate_name("material", &material.name)?;
    if let Some(parent) = &material.parent {
        validate_uuid(parent)?;
    }
    for model_uuid in material.model_uuids() {
        validate_uuid(model_uuid)?;
    }
    Ok(())
}

/// Listing query with one clause per filter criterion.
fn list_query(
    library_id: i64,
    filter: Option<&MaterialFilter>,
    options: MaterialFilterOptions,
) -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new(
        "SELECT m.material_id AS uuid, m.material_name AS name, fp.path AS path \
         FROM material m \
         LEFT JOIN folder_path fp ON fp.folder_id = m.folder_id \
         WHERE m.library_id = ",
    );
    qb.push_bind(library_id);

    if let Some(filter) = filter {
        if let Some(needle) = filter.name_contains.as_ref().filter(|n| !n.is_empty()) {
            qb.push(" AND instr(lower(m.material_name), lower(")
                .push_bind(needle.clone())
                .push(")) > 0");
        }
        for tag in &filter.tags {
            qb.push(
                " AND EXISTS (SELECT 1 FROM material_tag_mapping tm \
                 JOIN material_tag t ON t.material_tag_id = tm.material_tag_id \
                 WHERE tm.material_id = m.material_id AND t.material_tag_name = ",
            )
            .push_bind(tag.clone())
            .push(")");
        }
        for model_uuid in &filter.required_models {
            qb.push(
                " AND EXISTS (SELECT 1 FROM material_models mm \
                 WHERE mm.material_id = m.material_id AND mm.model_id = ",
            )
            .push_bind(model_uuid.clone())
            .push(")");
        }
    }

    if !options.include_legacy {
        qb.push(
            " AND EXISTS (SELECT 1 FROM material_models mm WHERE mm.material_id = m.material_id)",
        );
    }
    qb.push(" ORDER BY fp.path, m.material_name");
    qb
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository
// ─────────────────────────────────────────────────────────────────────────────

/// `SQLite` implementation of the `MaterialRepository` trait.
pub struct SqliteMaterialRepository {
    db: Arc<Database>,
}

impl SqliteMaterialRepository {
    pub const fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn list(
        &self,
        library: &str,
        filter: Option<&MaterialFilter>,
        options: MaterialFilterOptions,
    ) -> StoreResult<Vec<LibraryEntry>> {
        let mut conn = self.db.acquire().await?;
        let lib = require_library(&mut conn, library).await?;
        let rows = list_query(lib.library_id, filter, options)
            .build_query_as::<EntryRow>()
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows.into_iter().map(EntryRow::into_entry).collect())
    }

    async fn get(&self, uuid: &str) -> StoreResult<StoredMaterial> {
        let mut conn = self.db.acquire().await?;
        fetch_material(&mut conn, uuid).await
    }

    async fn create(&self, library: &str, path: &str, material: &Material) -> StoreResult<()> {
        validate_material(material)?;
        let mut tx = self.db.begin().await?;

        let lib = require_writable(&mut tx, library).await?;
        if material_exists(&mut tx, &material.uuid).await? {
            return Err(MaterialDbError::MaterialExists(material.uuid.clone()).into());
        }

        let folder = resolve_path(&mut tx, lib.library_id, path).await?;
        insert_material_rows(&mut tx, lib.library_id, folder, material).await?;
        tx.commit().await?;

        info!(uuid = %material.uuid, library, path, "Material created");
        Ok(())
    }

    async fn update(&self, library: &str, path: &str, material: &Material) -> StoreResult<()> {
        validate_material(material)?;
        let mut tx = self.db.begin().await?;

        let lib = require_writable(&mut tx, library).await?;
        let current = material_library(&mut tx, &material.uuid).await?;
        if current != lib.library_id {
            require_writable_id(&mut tx, current).await?;
        }
        let folder = resolve_path(&mut tx, lib.library_id, path).await?;

        sqlx::query(
            "UPDATE material SET library_id = ?, folder_id = ?, material_name = ?, \
                 material_author = ?, material_license = ?, material_parent_uuid = ?, \
                 material_description = ?, material_url = ?, material_reference = ? \
             WHERE material_id = ?",
        )
        .bind(lib.library_id)
        .bind(folder)
        .bind(&material.name)
        .bind(&material.author)
        .bind(&material.license)
        .bind(&material.parent)
        .bind(&material.description)
        .bind(&material.url)
        .bind(&material.reference)
        .bind(&material.uuid)
        .execute(&mut *tx)
        .await?;

        for sql in [
            "DELETE FROM material_tag_mapping WHERE material_id = ?",
            "DELETE FROM material_models WHERE material_id = ?",
            // Typed value rows go with their headers.
            "DELETE FROM material_property_value WHERE material_id = ?",
        ] {
            sqlx::query(sql)
                .bind(&material.uuid)
                .execute(&mut *tx)
                .await?;
        }
        link_tags(&mut tx, &material.uuid, &material.tags).await?;
        link_models(&mut tx, material).await?;
        write_values(&mut tx, material).await?;

        tx.commit().await?;
        info!(uuid = %material.uuid, library, "Material updated");
        Ok(())
    }

    async fn set_path(&self, library: &str, path: &str, uuid: &str) -> StoreResult<()> {
        let mut tx = self.db.begin().await?;
        let lib = require_writable(&mut tx, library).await?;
        if material_library(&mut tx, uuid).await? != lib.library_id {
            return Err(MaterialDbError::MaterialUpdate(format!(
                "material {uuid} is not in library '{library}'"
            ))
            .into());
        }

        let folder = resolve_path(&mut tx, lib.library_id, path).await?;
        sqlx::query("UPDATE material SET folder_id = ? WHERE material_id = ?")
            .bind(folder)
            .bind(uuid)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn rename(&self, library: &str, new_name: &str, uuid: &str) -> StoreResult<()> {
        validate_name("material", new_name)?;
        let mut tx = self.db.begin().await?;
        let lib = require_writable(&mut tx, library).await?;
        if material_library(&mut tx, uuid).await? != lib.library_id {
            return Err(MaterialDbError::Rename(format!(
                "material {uuid} is not in library '{library}'"
            ))
            .into());
        }

        sqlx::query("UPDATE material SET material_name = ? WHERE material_id = ?")
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
        let current = material_library(&mut tx, uuid).await?;
        require_writable_id(&mut tx, current).await?;

        let folder = resolve_path(&mut tx, destination.library_id, new_path).await?;
        sqlx::query("UPDATE material SET library_id = ?, folder_id = ? WHERE material_id = ?")
            .bind(destination.library_id)
            .bind(folder)
            .bind(uuid)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(uuid, library, path = new_path, "Material moved");
        Ok(())
    }

    async fn remove(&self, uuid: &str) -> StoreResult<()> {
        let mut tx = self.db.begin().await?;
        let current = material_library(&mut tx, uuid).await?;
        require_writable_id(&mut tx, current).await?;

        sqlx::query("DELETE FROM material WHERE material_id = ?")
            .bind(uuid)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(uuid, "Material removed");
        Ok(())
    }
}

#[async_trait]
impl MaterialRepository for SqliteMaterialRepository {
    async fn list_materials(
        &self,
        library: &str,
        filter: Option<&MaterialFilter>,
        options: Option<MaterialFilterOptions>,
    ) -> Result<Vec<LibraryEntry>, MaterialDbError> {
        self.list(library, filter, options.unwrap_or_default())
            .await
            .map_err(failed("list_materials", MaterialDbError::Storage))
    }

    async fn get_material(&self, uuid: &str) -> Result<StoredMaterial, MaterialDbError> {
        self.get(uuid)
            .await
            .map_err(failed("get_material", MaterialDbError::Storage))
    }

    async fn create_material(
        &self,
        library: &str,
        path: &str,
        material: &Material,
    ) -> Result<(), MaterialDbError> {
        self.create(library, path, material)
            .await
            .map_err(failed("create_material", MaterialDbError::MaterialCreation))
    }

    async fn update_material(
        &self,
        library: &str,
        path: &str,
        material: &Material,
    ) -> Result<(), MaterialDbError> {
        self.update(library, path, material)
            .await
            .map_err(failed("update_material", MaterialDbError::MaterialUpdate))
    }

    async fn set_material_path(
        &self,
        library: &str,
        path: &str,
        uuid: &str,
    ) -> Result<(), MaterialDbError> {
        self.set_path(library, path, uuid)
            .await
            .map_err(failed("set_material_path", MaterialDbError::MaterialUpdate))
    }

    async fn rename_material(
        &self,
        library: &str,
        new_name: &str,
        uuid: &str,
    ) -> Result<(), MaterialDbError> {
        self.rename(library, new_name, uuid)
            .await
            .map_err(failed("rename_material", MaterialDbError::Rename))
    }

    async fn move_material(
        &self,
        library: &str,
        new_path: &str,
        uuid: &str,
    ) -> Result<(), MaterialDbError> {
        self.relocate(library, new_path, uuid)
            .await
            .map_err(failed("move_material", MaterialDbError::MaterialUpdate))
    }

    async fn remove_material(&self, uuid: &str) -> Result<(), MaterialDbError> {
        self.remove(uuid)
            .await
            .map_err(failed("remove_material", MaterialDbError::Delete))
    }
}
