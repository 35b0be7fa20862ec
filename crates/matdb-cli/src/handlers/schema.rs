//! Schema provisioning handlers: create-db, init, drop-tables.
//!
//! These run before (or instead of) the regular bootstrap because they act
//! on the database itself.

use anyhow::Result;
use tracing::info;

use matdb_db::{Database, create_database, database_exists, drop_tables, setup_database};

use crate::bootstrap::CliConfig;
use crate::utils::input::confirm_unless_forced;

/// Drop and recreate the database file.
pub async fn create_db(config: &CliConfig, force: bool) -> Result<()> {
    let url = &config.database.url;
    if database_exists(url).await?
        && !confirm_unless_forced(force, &format!("Replace the existing database at {url}?"))?
    {
        println!("Create cancelled.");
        return Ok(());
    }

    create_database(url).await?;
    let db = setup_database(&config.database).await?;
    db.close().await;
    println!("Created database {url}");
    Ok(())
}

/// Create any missing tables and the folder path view.
pub async fn init(config: &CliConfig) -> Result<()> {
    let db = setup_database(&config.database).await?;
    db.close().await;
    println!("Schema ready at {}", config.database.url);
    Ok(())
}

/// Drop every table and view, keeping the database file.
pub async fn drop_all(config: &CliConfig, force: bool) -> Result<()> {
    if !confirm_unless_forced(force, "Drop every table? All data is lost.")? {
        println!("Drop cancelled.");
        return Ok(());
    }

    let db = Database::new(config.database.clone())?;
    drop_tables(&db).await?;
    db.close().await;
    info!(url = %config.database.url, "Tables dropped");
    println!("Dropped all tables.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use matdb_core::DatabaseConfig;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_init_and_drop_on_disk() {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("cli.db").display());
        let config = CliConfig::with_database(DatabaseConfig::new(url.clone()));

        create_db(&config, true).await.unwrap();
        assert!(database_exists(&url).await.unwrap());
        init(&config).await.unwrap();
        drop_all(&config, true).await.unwrap();
        // Dropping leaves the file in place; init provisions it again.
        assert!(database_exists(&url).await.unwrap());
        init(&config).await.unwrap();
    }
}
