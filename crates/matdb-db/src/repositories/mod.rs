//! Repository implementations using `SQLite`.
//!
//! These implementations encapsulate all SQL queries and database access.
//! The connection types are confined to this module and never exposed
//! through the port trait signatures.
//!
//! Facades acquire one connection or transaction per call and hand it to
//! the helper modules (`folders`, `codec`, row mappers), which take a
//! `&mut SqliteConnection` and return the crate-private `StoreError`.

mod bulk_load;
mod codec;
mod error;
mod folders;
mod libraries;
mod row_mappers;
mod sqlite_folder_repository;
mod sqlite_library_repository;
mod sqlite_material_repository;
mod sqlite_model_repository;

pub use bulk_load::SqliteBulkLoadRepository;
pub use sqlite_folder_repository::SqliteFolderRepository;
pub use sqlite_library_repository::SqliteLibraryRepository;
pub use sqlite_material_repository::SqliteMaterialRepository;
pub use sqlite_model_repository::SqliteModelRepository;
