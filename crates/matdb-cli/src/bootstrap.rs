//! CLI bootstrap - the composition root.
//!
//! This module is the only place where the `SQLite` adapter is wired to the
//! core facade. Command handlers receive a `CliContext` and go through its
//! `MaterialManager`.

use std::env;
use std::sync::Arc;

use anyhow::Result;
use matdb_core::config::ENV_DATABASE_URL;
use matdb_core::{DatabaseConfig, MaterialManager};
use matdb_db::{Database, StoreFactory, setup_database};
use tracing::debug;

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub database: DatabaseConfig,
}

impl CliConfig {
    /// Read `MATDB_*` variables, with `database_url` taking precedence.
    pub fn resolve(database_url: Option<&str>) -> Result<Self, CliError> {
        let database = DatabaseConfig::from_lookup(|name| match database_url {
            Some(url) if name == ENV_DATABASE_URL => Some(url.to_string()),
            _ => env::var(name).ok(),
        })?;
        Ok(Self { database })
    }

    pub const fn with_database(database: DatabaseConfig) -> Self {
        Self { database }
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    db: Arc<Database>,
    manager: MaterialManager,
}

impl CliContext {
    /// Access the storage facade.
    pub const fn manager(&self) -> &MaterialManager {
        &self.manager
    }

    pub const fn database(&self) -> &Arc<Database> {
        &self.db
    }
}

/// Open the database, creating the schema if it is missing.
pub async fn bootstrap(config: &CliConfig) -> Result<CliContext> {
    let db = Arc::new(setup_database(&config.database).await?);
    debug!(url = %config.database.url, "Database ready");
    Ok(bootstrap_with(db))
}

/// Compose a context over an already provisioned database.
pub fn bootstrap_with(db: Arc<Database>) -> CliContext {
    let manager = StoreFactory::build_manager(&db);
    CliContext { db, manager }
}
