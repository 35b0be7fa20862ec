//! Model and material listing handlers.

use std::collections::BTreeSet;

use anyhow::Result;

use matdb_core::{
    MaterialFilter, MaterialFilterOptions, MaterialRepository, ModelRepository,
};

use crate::bootstrap::CliContext;
use crate::presentation::format_entries;

/// Execute the models command.
pub async fn models(ctx: &CliContext, library: &str) -> Result<()> {
    let entries = ctx.manager().models().list_models(library).await?;
    if entries.is_empty() {
        println!("No models in '{library}'.");
        return Ok(());
    }
    println!("Found {} model(s) in '{library}':\n", entries.len());
    print!("{}", format_entries(&entries));
    Ok(())
}

/// Build the listing filter from command-line criteria.
pub fn material_filter(
    name: Option<String>,
    tags: Vec<String>,
    models: Vec<String>,
) -> Option<MaterialFilter> {
    let filter = MaterialFilter {
        name_contains: name.filter(|n| !n.is_empty()),
        tags: tags.into_iter().collect::<BTreeSet<_>>(),
        required_models: models.into_iter().collect(),
    };
    (!filter.is_empty()).then_some(filter)
}

/// Execute the materials command.
pub async fn materials(
    ctx: &CliContext,
    library: &str,
    filter: Option<MaterialFilter>,
    include_legacy: bool,
) -> Result<()> {
    let options = MaterialFilterOptions { include_legacy };
    let entries = ctx
        .manager()
        .materials()
        .list_materials(library, filter.as_ref(), Some(options))
        .await?;
    if entries.is_empty() {
        println!("No matching materials in '{library}'.");
        return Ok(());
    }
    println!("Found {} material(s) in '{library}':\n", entries.len());
    print!("{}", format_entries(&entries));
    Ok(())
}
