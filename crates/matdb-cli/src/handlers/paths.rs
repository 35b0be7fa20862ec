//! Paths command handler.

use anyhow::Result;

use matdb_core::data_root;
use matdb_db::database_exists;

use crate::bootstrap::CliConfig;

/// Print the resolved locations in `key = value` format.
pub async fn execute(config: &CliConfig) -> Result<()> {
    let url = &config.database.url;
    println!("data_root = {}", data_root()?.display());
    println!("database_url = {url}");
    println!("database_exists = {}", database_exists(url).await?);
    Ok(())
}
