//! Load command handler.
//!
//! Reads a JSON batch of the form
//! `{"models": [{"library", "path", "model"}], "materials": [...]}`.

use std::path::Path;

use anyhow::Result;

use matdb_core::BulkBatch;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Parse a batch file.
pub async fn read_batch(file: &Path) -> Result<BulkBatch, CliError> {
    let bytes = tokio::fs::read(file)
        .await
        .map_err(|e| CliError::Io(format!("{}: {e}", file.display())))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Execute the load command.
///
/// Without `checked`, the batch goes through the bulk loader: items may
/// appear in any order and read-only libraries are accepted. With
/// `checked`, items are created one by one with integrity checks on, so
/// parents must precede children.
pub async fn execute(ctx: &CliContext, file: &Path, checked: bool) -> Result<()> {
    let batch = read_batch(file).await?;
    let manager = ctx.manager();

    if checked {
        let models = manager.import_models(&batch.models).await?;
        let materials = manager.import_materials(&batch.materials).await?;
        println!(
            "Models: {} created, {} skipped",
            models.created, models.skipped
        );
        println!(
            "Materials: {} created, {} skipped",
            materials.created, materials.skipped
        );
        return Ok(());
    }

    let report = manager.load_batch(&batch).await?;
    println!(
        "Models: {} created, {} skipped",
        report.models_created, report.models_skipped
    );
    println!(
        "Materials: {} created, {} skipped",
        report.materials_created, report.materials_skipped
    );
    if report.dangling_references > 0 {
        println!(
            "Warning: {} unresolved reference(s) remain",
            report.dangling_references
        );
    }
    Ok(())
}
