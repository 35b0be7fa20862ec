//! Port definitions (trait abstractions) for the storage layer.
//!
//! Ports define the interfaces that the core domain expects from
//! infrastructure. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` types in any signature
//! - Every method returns [`MaterialDbError`]
//! - "Already exists" and "not found" errors are never wrapped, so callers
//!   can branch on them with [`MaterialDbError::is_exists`] and
//!   [`MaterialDbError::is_not_found`]

pub mod bulk_load;
pub mod folder_repository;
pub mod library_repository;
pub mod material_repository;
pub mod model_repository;

use std::sync::Arc;
use thiserror::Error;

pub use bulk_load::BulkLoadRepository;
pub use folder_repository::FolderRepository;
pub use library_repository::LibraryRepository;
pub use material_repository::MaterialRepository;
pub use model_repository::ModelRepository;

/// Container for all repository trait objects.
///
/// Lives in `matdb-core` so services can accept it without depending on
/// `matdb-db`.
///
/// # Example
///
/// ```ignore
/// let repos = matdb_db::StoreFactory::build_repos(&database);
/// let manager = MaterialManager::new(repos);
/// ```
#[derive(Clone)]
pub struct Repos {
    pub libraries: Arc<dyn LibraryRepository>,
    pub folders: Arc<dyn FolderRepository>,
    pub models: Arc<dyn ModelRepository>,
    pub materials: Arc<dyn MaterialRepository>,
    /// Referential checks suspended; provisioning and migration only.
    pub bulk: Arc<dyn BulkLoadRepository>,
}

impl Repos {
    pub fn new(
        libraries: Arc<dyn LibraryRepository>,
        folders: Arc<dyn FolderRepository>,
        models: Arc<dyn ModelRepository>,
        materials: Arc<dyn MaterialRepository>,
        bulk: Arc<dyn BulkLoadRepository>,
    ) -> Self {
        Self {
            libraries,
            folders,
            models,
            materials,
            bulk,
        }
    }
}

/// Errors surfaced by every storage operation.
///
/// Wrapping variants carry the underlying cause as text so messages stay
/// diagnosable without exposing driver types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaterialDbError {
    /// The connection could not be (re)established within the retry budget.
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Library not found: {0}")]
    LibraryNotFound(String),

    #[error("Library is read only: {0}")]
    LibraryReadOnly(String),

    #[error("Unable to create library: {0}")]
    LibraryCreation(String),

    #[error("Model already exists: {0}")]
    ModelExists(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Material already exists: {0}")]
    MaterialExists(String),

    #[error("Material not found: {0}")]
    MaterialNotFound(String),

    #[error("Unable to create folder: {0}")]
    FolderCreation(String),

    #[error("Unable to create model: {0}")]
    ModelCreation(String),

    #[error("Unable to create material: {0}")]
    MaterialCreation(String),

    #[error("Unable to update model: {0}")]
    ModelUpdate(String),

    #[error("Unable to update material: {0}")]
    MaterialUpdate(String),

    #[error("Unable to change icon: {0}")]
    Icon(String),

    #[error("Rename failed: {0}")]
    Rename(String),

    #[error("Delete failed: {0}")]
    Delete(String),

    /// Accepting the edge would make `model` its own ancestor.
    #[error("Model {model} cannot inherit from {parent}: inheritance cycle")]
    InheritanceCycle { model: String, parent: String },

    /// A property value does not fit its declared type.
    #[error("Invalid value for property '{property}': {reason}")]
    InvalidValue { property: String, reason: String },

    /// Schema provisioning failed.
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Unable to create database: {0}")]
    DatabaseCreation(String),

    /// Invalid caller input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A read failed in the storage backend.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl MaterialDbError {
    /// Idempotency signal: the object is already stored.
    pub const fn is_exists(&self) -> bool {
        matches!(self, Self::ModelExists(_) | Self::MaterialExists(_))
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::LibraryNotFound(_) | Self::ModelNotFound(_) | Self::MaterialNotFound(_)
        )
    }

    pub const fn is_read_only(&self) -> bool {
        matches!(self, Self::LibraryReadOnly(_))
    }

    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Errors that must pass through outer wrapping unchanged.
    pub const fn is_classified(&self) -> bool {
        self.is_exists()
            || self.is_not_found()
            || self.is_read_only()
            || self.is_connection()
            || matches!(
                self,
                Self::InheritanceCycle { .. } | Self::InvalidValue { .. } | Self::Validation(_)
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(MaterialDbError::ModelExists("x".into()).is_exists());
        assert!(MaterialDbError::MaterialExists("x".into()).is_exists());
        assert!(!MaterialDbError::ModelCreation("x".into()).is_exists());
        assert!(MaterialDbError::LibraryNotFound("x".into()).is_not_found());
        assert!(MaterialDbError::LibraryReadOnly("x".into()).is_classified());
        assert!(!MaterialDbError::Delete("x".into()).is_classified());
    }

    #[test]
    fn test_message_includes_cause() {
        let err = MaterialDbError::Delete("FOREIGN KEY constraint failed".into());
        assert_eq!(err.to_string(), "Delete failed: FOREIGN KEY constraint failed");
    }
}
