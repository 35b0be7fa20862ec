//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (database, filesystem, etc.).
//!
//! # Structure
//!
//! - `library` - Libraries and listing entries
//! - `model` - Model schemas (`Model`, `ModelProperty`)
//! - `material` - Materials, their values and listing filters
//! - `property` - Declared property types and storage shapes
//! - `value` - Property values, arrays and quantities
//! - `bulk` - Bulk-load batches and reports

mod bulk;
mod library;
mod material;
mod model;
mod property;
mod value;

pub use bulk::{BulkBatch, BulkLoadReport, BulkMaterial, BulkModel};
pub use library::{Library, LibraryEntry, StoredMaterial, StoredModel, StoredObject, normalize_icon};
pub use material::{Material, MaterialFilter, MaterialFilterOptions, MaterialValue};
pub use model::{Model, ModelProperty, ModelType};
pub use property::{PropertyType, ValueShape};
pub use value::{
    Array2D, Array3D, ArrayError, CanonicalText, DepthSlice, PropertyValue, Quantity,
};
