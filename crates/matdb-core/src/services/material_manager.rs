//! `MaterialManager` - the facade handed to callers.
//!
//! Adapters (the CLI, a host application) receive a `MaterialManager` built
//! from a [`Repos`] container and use it for every storage operation.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{BulkBatch, BulkLoadReport, BulkMaterial, BulkModel, Model};
use crate::ports::{
    FolderRepository, LibraryRepository, MaterialDbError, MaterialRepository, ModelRepository,
    Repos,
};

use super::inheritance;

/// Result of importing objects one at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub created: usize,
    /// Objects whose uuid was already stored.
    pub skipped: usize,
}

/// The storage facade.
///
/// # Example
///
/// ```ignore
/// let manager = MaterialManager::new(repos);
/// manager.libraries().create_library("User", None, false).await?;
/// manager.models().create_model("User", "Mechanical", &model).await?;
/// ```
pub struct MaterialManager {
    repos: Repos,
}

impl MaterialManager {
    pub const fn new(repos: Repos) -> Self {
        Self { repos }
    }

    pub fn libraries(&self) -> &dyn LibraryRepository {
        self.repos.libraries.as_ref()
    }

    pub fn folders(&self) -> &dyn FolderRepository {
        self.repos.folders.as_ref()
    }

    pub fn models(&self) -> &dyn ModelRepository {
        self.repos.models.as_ref()
    }

    pub fn materials(&self) -> &dyn MaterialRepository {
        self.repos.materials.as_ref()
    }

    /// A model with its ancestors' properties merged in (flagged `inherited`).
    pub async fn effective_model(&self, uuid: &str) -> Result<Model, MaterialDbError> {
        inheritance::effective_model(self.models(), uuid).await
    }

    /// Ancestor uuids of a model, nearest first.
    pub async fn model_ancestors(&self, uuid: &str) -> Result<Vec<String>, MaterialDbError> {
        inheritance::ancestors(self.models(), uuid).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Migration
    // ─────────────────────────────────────────────────────────────────────────

    /// Create models one by one with integrity checks on.
    ///
    /// A model that already exists is counted as skipped; any other error
    /// stops the import. Models must be ordered parents first.
    pub async fn import_models(&self, items: &[BulkModel]) -> Result<ImportSummary, MaterialDbError> {
        let mut summary = ImportSummary::default();
        for item in items {
            match self
                .models()
                .create_model(&item.library, &item.path, &item.model)
                .await
            {
                Ok(()) => summary.created += 1,
                Err(e) if e.is_exists() => {
                    debug!(uuid = %item.model.uuid, "Model already imported");
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        info!(
            created = summary.created,
            skipped = summary.skipped,
            "Imported models"
        );
        Ok(summary)
    }

    /// Create materials one by one; see [`Self::import_models`].
    pub async fn import_materials(
        &self,
        items: &[BulkMaterial],
    ) -> Result<ImportSummary, MaterialDbError> {
        let mut summary = ImportSummary::default();
        for item in items {
            match self
                .materials()
                .create_material(&item.library, &item.path, &item.material)
                .await
            {
                Ok(()) => summary.created += 1,
                Err(e) if e.is_exists() => {
                    debug!(uuid = %item.material.uuid, "Material already imported");
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        info!(
            created = summary.created,
            skipped = summary.skipped,
            "Imported materials"
        );
        Ok(summary)
    }

    /// Load a whole batch with referential checks suspended.
    pub async fn load_batch(&self, batch: &BulkBatch) -> Result<BulkLoadReport, MaterialDbError> {
        if batch.is_empty() {
            return Ok(BulkLoadReport::default());
        }
        let report = self.repos.bulk.bulk_load(batch).await?;
        if report.dangling_references > 0 {
            warn!(
                dangling = report.dangling_references,
                "Bulk load left unresolved references"
            );
        }
        Ok(report)
    }
}
