//! Material repository trait definition.

use async_trait::async_trait;

use super::MaterialDbError;
use crate::domain::{LibraryEntry, Material, MaterialFilter, MaterialFilterOptions, StoredMaterial};

/// Repository for material persistence operations.
///
/// Mirrors [`super::ModelRepository`]. Tags are shared between materials by
/// name; property values are stored per their declared type.
#[async_trait]
pub trait MaterialRepository: Send + Sync {
    /// Materials in a library matching `filter`, with their folder paths.
    async fn list_materials(
        &self,
        library: &str,
        filter: Option<&MaterialFilter>,
        options: Option<MaterialFilterOptions>,
    ) -> Result<Vec<LibraryEntry>, MaterialDbError>;

    /// # Errors
    ///
    /// - `MaterialNotFound` if the uuid is unknown
    async fn get_material(&self, uuid: &str) -> Result<StoredMaterial, MaterialDbError>;

    /// # Errors
    ///
    /// - `MaterialExists` if the uuid is already stored
    /// - `LibraryNotFound`, `LibraryReadOnly` for the target library
    /// - `InvalidValue` if a value does not match its declared type
    /// - `MaterialCreation` for storage errors
    async fn create_material(
        &self,
        library: &str,
        path: &str,
        material: &Material,
    ) -> Result<(), MaterialDbError>;

    /// Replace scalar fields, tags, model links and every property value.
    ///
    /// # Errors
    ///
    /// - `MaterialNotFound` if the uuid is unknown
    /// - `MaterialUpdate` for storage errors
    async fn update_material(
        &self,
        library: &str,
        path: &str,
        material: &Material,
    ) -> Result<(), MaterialDbError>;

    async fn set_material_path(
        &self,
        library: &str,
        path: &str,
        uuid: &str,
    ) -> Result<(), MaterialDbError>;

    async fn rename_material(
        &self,
        library: &str,
        new_name: &str,
        uuid: &str,
    ) -> Result<(), MaterialDbError>;

    async fn move_material(
        &self,
        library: &str,
        new_path: &str,
        uuid: &str,
    ) -> Result<(), MaterialDbError>;

    /// # Errors
    ///
    /// - `MaterialNotFound` if the uuid is unknown
    /// - `Delete` if another material names it as parent
    async fn remove_material(&self, uuid: &str) -> Result<(), MaterialDbError>;
}
