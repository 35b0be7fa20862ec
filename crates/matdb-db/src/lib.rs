#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unsafe_code)]

pub mod connection;
pub mod factory;
pub mod repositories;
pub mod setup;

pub use connection::Database;

// Re-export factory for convenient access
pub use factory::StoreFactory;

// Re-export TestDb for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub use factory::TestDb;

// Re-export repository implementations
pub use repositories::{
    SqliteBulkLoadRepository, SqliteFolderRepository, SqliteLibraryRepository,
    SqliteMaterialRepository, SqliteModelRepository,
};

// Re-export setup functions for convenient access
pub use setup::{
    create_database, create_routines, create_tables, database_exists, drop_routines, drop_tables,
    setup_database,
};
#[cfg(any(test, feature = "test-utils"))]
pub use setup::setup_test_database;
