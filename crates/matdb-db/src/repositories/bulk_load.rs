//! Bulk loading with referential checks suspended.
//!
//! Used for provisioning and migrating whole libraries, where items may
//! reference one another in any order and read-only system libraries are
//! the target. One connection is held for the whole load; foreign keys are
//! switched off on it, each item is written in its own transaction, and
//! enforcement is switched back on before the connection is released.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Connection, Row, SqliteConnection};
use tracing::{debug, info, warn};

use matdb_core::{
    BulkBatch, BulkLoadReport, BulkLoadRepository, BulkMaterial, BulkModel, MaterialDbError,
};

use super::error::{StoreError, StoreResult, failed};
use super::folders::resolve_path;
use super::libraries::require_library;
use super::sqlite_material_repository::{insert_material_rows, material_exists};
use super::sqlite_model_repository::{check_cycle, insert_model_rows, model_exists};
use crate::connection::Database;

pub struct SqliteBulkLoadRepository {
    db: Arc<Database>,
}

/// Outcome of loading a single item.
enum Loaded {
    Created,
    Skipped,
}

async fn load_model(conn: &mut SqliteConnection, item: &BulkModel) -> StoreResult<Loaded> {
    let mut tx = conn.begin().await?;
    // Read-only is not checked: system libraries are provisioned here.
    let lib = require_library(&mut tx, &item.library).await?;
    if model_exists(&mut tx, &item.model.uuid).await? {
        return Ok(Loaded::Skipped);
    }
    check_cycle(&mut tx, &item.model.uuid, &item.model.inherits).await?;
    let folder = resolve_path(&mut tx, lib.library_id, &item.path).await?;
    insert_model_rows(&mut tx, lib.library_id, folder, &item.model).await?;
    tx.commit().await?;
    Ok(Loaded::Created)
}

async fn load_material(conn: &mut SqliteConnection, item: &BulkMaterial) -> StoreResult<Loaded> {
    let mut tx = conn.begin().await?;
    let lib = require_library(&mut tx, &item.library).await?;
    if material_exists(&mut tx, &item.material.uuid).await? {
        return Ok(Loaded::Skipped);
    }
    let folder = resolve_path(&mut tx, lib.library_id, &item.path).await?;
    insert_material_rows(&mut tx, lib.library_id, folder, &item.material).await?;
    tx.commit().await?;
    Ok(Loaded::Created)
}

async fn load_items(
    conn: &mut SqliteConnection,
    batch: &BulkBatch,
    report: &mut BulkLoadReport,
) -> StoreResult<()> {
    for item in &batch.models {
        let loaded = load_model(conn, item)
            .await
            .map_err(|e| StoreError::Domain(e.wrap(MaterialDbError::ModelCreation)))?;
        match loaded {
            Loaded::Created => report.models_created += 1,
            Loaded::Skipped => {
                debug!(uuid = %item.model.uuid, "Model already stored, skipped");
                report.models_skipped += 1;
            }
        }
    }

    for item in &batch.materials {
        let loaded = load_material(conn, item)
            .await
            .map_err(|e| StoreError::Domain(e.wrap(MaterialDbError::MaterialCreation)))?;
        match loaded {
            Loaded::Created => report.materials_created += 1,
            Loaded::Skipped => {
                debug!(uuid = %item.material.uuid, "Material already stored, skipped");
                report.materials_skipped += 1;
            }
        }
    }
    Ok(())
}

/// Rows whose foreign keys point at nothing, counted per table.
async fn dangling_references(conn: &mut SqliteConnection) -> StoreResult<usize> {
    let rows = sqlx::query("PRAGMA foreign_key_check")
        .fetch_all(&mut *conn)
        .await?;

    let mut per_table: BTreeMap<String, usize> = BTreeMap::new();
    for row in &rows {
        let table: String = row.try_get(0)?;
        *per_table.entry(table).or_default() += 1;
    }
    for (table, count) in &per_table {
        warn!(table = %table, count, "Dangling references after bulk load");
    }
    Ok(rows.len())
}

impl SqliteBulkLoadRepository {
    pub const fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn load(&self, batch: &BulkBatch) -> StoreResult<BulkLoadReport> {
        let mut conn = self.db.acquire().await?;
        sqlx::query("PRAGMA foreign_keys = OFF")
            .execute(&mut *conn)
            .await?;

        let mut report = BulkLoadReport::default();
        let outcome = load_items(&mut conn, batch, &mut report).await;

        let restored = sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&mut *conn)
            .await;
        outcome?;
        restored?;

        report.dangling_references = dangling_references(&mut conn).await?;
        info!(
            models_created = report.models_created,
            models_skipped = report.models_skipped,
            materials_created = report.materials_created,
            materials_skipped = report.materials_skipped,
            dangling = report.dangling_references,
            "Bulk load finished"
        );
        Ok(report)
    }
}

#[async_trait]
impl BulkLoadRepository for SqliteBulkLoadRepository {
    async fn bulk_load(&self, batch: &BulkBatch) -> Result<BulkLoadReport, MaterialDbError> {
        self.load(batch)
            .await
            .map_err(failed("bulk_load", MaterialDbError::Storage))
    }
}
