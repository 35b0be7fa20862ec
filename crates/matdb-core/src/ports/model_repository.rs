//! Model repository trait definition.
//!
//! This port defines the interface for model persistence operations.
//! Implementations must handle all storage details internally.

use async_trait::async_trait;

use super::MaterialDbError;
use crate::domain::{LibraryEntry, Model, StoredModel};

/// Repository for model persistence operations.
///
/// # Design Rules
///
/// - Mutations check the target library exists and is writable
/// - Properties flagged `inherited` are never persisted
/// - Inheritance cycles are rejected at write time
#[async_trait]
pub trait ModelRepository: Send + Sync {
    /// Models stored in a library, with their folder paths.
    async fn list_models(&self, library: &str) -> Result<Vec<LibraryEntry>, MaterialDbError>;

    /// # Errors
    ///
    /// - `ModelNotFound` if the uuid is unknown
    async fn get_model(&self, uuid: &str) -> Result<StoredModel, MaterialDbError>;

    /// # Errors
    ///
    /// - `ModelExists` if the uuid is already stored
    /// - `LibraryNotFound`, `LibraryReadOnly` for the target library
    /// - `InheritanceCycle` if a parent already descends from this model
    /// - `ModelCreation` for storage errors
    async fn create_model(
        &self,
        library: &str,
        path: &str,
        model: &Model,
    ) -> Result<(), MaterialDbError>;

    /// Replace scalar fields and inheritance edges; drop properties no longer
    /// present and add new ones. Existing property rows are left as they are.
    ///
    /// # Errors
    ///
    /// - `ModelNotFound` if the uuid is unknown
    /// - `ModelUpdate` for storage errors
    async fn update_model(
        &self,
        library: &str,
        path: &str,
        model: &Model,
    ) -> Result<(), MaterialDbError>;

    /// Put the model at `path` inside `library`.
    async fn set_model_path(
        &self,
        library: &str,
        path: &str,
        uuid: &str,
    ) -> Result<(), MaterialDbError>;

    async fn rename_model(
        &self,
        library: &str,
        new_name: &str,
        uuid: &str,
    ) -> Result<(), MaterialDbError>;

    /// Move into `library` at `new_path`. Both the current and the
    /// destination library must be writable.
    async fn move_model(
        &self,
        library: &str,
        new_path: &str,
        uuid: &str,
    ) -> Result<(), MaterialDbError>;

    /// # Errors
    ///
    /// - `ModelNotFound` if the uuid is unknown
    /// - `Delete` if another model still inherits from it
    async fn remove_model(&self, uuid: &str) -> Result<(), MaterialDbError>;
}
