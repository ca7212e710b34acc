//! Embedded vanilla catalog.
//!
//! A curated subset of the base game (44 recipes): chests, belts, inserters,
//! poles, rails, modules, science packs, intermediates and smelting, plus the
//! machines and logistic chests the default settings refer to. Import a full
//! in-game export for everything else.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::catalog::Catalog;
use crate::error::Result;

/// Export-format text of the embedded base game subset.
pub const VANILLA_EXPORT: &str = include_str!("../data/vanilla.meg");

static VANILLA: OnceCell<Arc<Catalog>> = OnceCell::new();

/// The vanilla catalog, normalized on first use and shared afterwards.
pub fn catalog() -> Result<Arc<Catalog>> {
    VANILLA
        .get_or_try_init(|| {
            info!("loading embedded vanilla catalog");
            Catalog::from_export_text(VANILLA_EXPORT).map(Arc::new)
        })
        .cloned()
}
