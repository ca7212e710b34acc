//! `export-catalog` and `export-command` handlers.

use anyhow::{Context, Result};
use tracing::info;

use blueprint_kit_lib::{Catalog, EXPORT_COMMAND};

/// Re-emit the active catalog in import-file format.
pub fn handle_export_catalog(catalog: &Catalog) -> Result<String> {
    let text = catalog
        .to_export_text()
        .context("failed to serialize the catalog")?;
    info!(
        recipes = catalog.recipes.len(),
        bytes = text.len(),
        "exported catalog"
    );
    Ok(text)
}

/// The console command that writes an import file from a running game.
pub fn handle_export_command() -> &'static str {
    EXPORT_COMMAND
}
