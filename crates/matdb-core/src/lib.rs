#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod paths;
pub mod ports;
pub mod services;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{ConfigError, DatabaseConfig};
pub use domain::{
    Array2D, Array3D, ArrayError, BulkBatch, BulkLoadReport, BulkMaterial, BulkModel,
    CanonicalText, DepthSlice, Library, LibraryEntry, Material, MaterialFilter,
    MaterialFilterOptions, MaterialValue, Model, ModelProperty, ModelType, PropertyType,
    PropertyValue, Quantity, StoredMaterial, StoredModel, StoredObject, ValueShape,
};
pub use paths::{PathError, data_root, database_path, default_database_url};
pub use ports::{
    BulkLoadRepository, FolderRepository, LibraryRepository, MaterialDbError, MaterialRepository,
    ModelRepository, Repos,
};
pub use services::{ImportSummary, MaterialManager};
