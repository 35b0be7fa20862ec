//! Bulk-load batches used when provisioning or migrating whole libraries.

use serde::{Deserialize, Serialize};

use super::{Material, Model};

/// A model queued for bulk load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkModel {
    pub library: String,
    #[serde(default)]
    pub path: String,
    pub model: Model,
}

/// A material queued for bulk load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkMaterial {
    pub library: String,
    #[serde(default)]
    pub path: String,
    pub material: Material,
}

/// Objects to insert with referential checks suspended.
///
/// Items may reference one another in any order; references are checked
/// once the whole batch has been written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkBatch {
    #[serde(default)]
    pub models: Vec<BulkModel>,
    #[serde(default)]
    pub materials: Vec<BulkMaterial>,
}

impl BulkBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_model(&mut self, library: impl Into<String>, path: impl Into<String>, model: Model) {
        self.models.push(BulkModel {
            library: library.into(),
            path: path.into(),
            model,
        });
    }

    pub fn add_material(
        &mut self,
        library: impl Into<String>,
        path: impl Into<String>,
        material: Material,
    ) {
        self.materials.push(BulkMaterial {
            library: library.into(),
            path: path.into(),
            material,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.materials.is_empty()
    }
}

/// Outcome of a bulk load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkLoadReport {
    pub models_created: usize,
    /// Models whose uuid already existed.
    pub models_skipped: usize,
    pub materials_created: usize,
    pub materials_skipped: usize,
    /// Rows still referencing a missing parent after the load.
    pub dangling_references: usize,
}
