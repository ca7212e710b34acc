//! Host-facing state and operation boundary.
//!
//! A [`Session`] holds the current catalog, settings and recipe selection.
//! Hosts call [`Session::recompute`] after every edit. Operation failures
//! are logged here and turned into sentinel output; they never disturb the
//! session state.

use std::sync::Arc;

use tracing::{info, warn};

use crate::aggregate::RemapTable;
use crate::catalog::Catalog;
use crate::codec::{decode_to_json, encode_from_json, encode_plan};
use crate::error::Result;
use crate::layout::layout_blueprint;
use crate::plan::Plan;
use crate::selection::RecipeSelection;
use crate::settings::{SettingChange, Settings};
use crate::signals::{convert_blueprint_to_signals, SignalOptions};

/// Shown in place of JSON when a plan string cannot be decoded.
pub const INVALID_BLUEPRINT: &str = "invalid blueprint string";
/// Shown in place of a plan string when JSON cannot be encoded.
pub const INVALID_JSON: &str = "invalid JSON";

#[derive(Debug, Clone)]
pub struct Session {
    catalog: Arc<Catalog>,
    pub settings: Settings,
    pub selection: RecipeSelection,
}

impl Session {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            settings: Settings::default(),
            selection: RecipeSelection::new(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Replace the catalog with an imported one.
    ///
    /// The new catalog is fully built before the swap; on error the session
    /// is unchanged. A successful import clears the recipe selection.
    pub fn import_catalog(&mut self, export_text: &str) -> Result<()> {
        let catalog = Catalog::from_export_text(export_text)?;
        info!(recipes = catalog.recipes.len(), "imported catalog");
        self.catalog = Arc::new(catalog);
        self.selection.clear();
        Ok(())
    }

    pub fn apply(&mut self, change: SettingChange) {
        self.settings = std::mem::take(&mut self.settings).with_change(change);
    }

    pub fn select_machine(&mut self, category: &str, machine: &str) {
        self.apply(SettingChange::Machine {
            category: category.to_string(),
            machine: machine.to_string(),
        });
    }

    /// Generate the blueprint for the current selection.
    pub fn generate(&self) -> Result<String> {
        let recipes = self.selection.ordered(&self.catalog);
        let blueprint = layout_blueprint(&recipes, &self.catalog, &self.settings)?;
        encode_plan(&Plan::Blueprint(blueprint))
    }

    /// [`Session::generate`], with failures logged and shown as "".
    pub fn recompute(&self) -> String {
        self.generate().unwrap_or_else(|err| {
            warn!(error = %err, "blueprint generation failed");
            String::new()
        })
    }
}

/// Signal conversion with failures logged and shown as "".
pub fn convert_or_empty(plan_string: &str, table: &RemapTable, options: &SignalOptions) -> String {
    convert_blueprint_to_signals(plan_string, table, options).unwrap_or_else(|err| {
        warn!(error = %err, "signal conversion failed");
        String::new()
    })
}

pub fn decode_to_json_or_sentinel(plan_string: &str) -> String {
    decode_to_json(plan_string).unwrap_or_else(|err| {
        warn!(error = %err, "plan string could not be decoded");
        INVALID_BLUEPRINT.to_string()
    })
}

pub fn encode_from_json_or_sentinel(json: &str) -> String {
    encode_from_json(json).unwrap_or_else(|err| {
        warn!(error = %err, "plan JSON could not be encoded");
        INVALID_JSON.to_string()
    })
}
