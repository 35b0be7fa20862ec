//! Model and material dump handlers.

use anyhow::Result;

use matdb_core::{MaterialRepository, ModelRepository, StoredModel};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::to_json;

/// A stored model, optionally with its ancestors' properties merged in.
pub async fn load_model(ctx: &CliContext, uuid: &str, effective: bool) -> Result<StoredModel> {
    let mut stored = ctx.manager().models().get_model(uuid).await?;
    if effective {
        stored.object = ctx.manager().effective_model(uuid).await?;
    }
    Ok(stored)
}

/// Execute the model command.
pub async fn model(ctx: &CliContext, uuid: &str, effective: bool) -> Result<()> {
    let stored = load_model(ctx, uuid, effective).await?;
    println!("{}", to_json(&stored).map_err(CliError::from)?);
    Ok(())
}

/// Execute the material command.
pub async fn material(ctx: &CliContext, uuid: &str) -> Result<()> {
    let stored = ctx.manager().materials().get_material(uuid).await?;
    println!("{}", to_json(&stored).map_err(CliError::from)?);
    Ok(())
}
