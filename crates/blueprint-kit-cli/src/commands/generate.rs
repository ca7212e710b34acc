//! `generate` command: "make everything" blueprint for a recipe selection.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use blueprint_kit_lib::{Catalog, RecipeFilter, Session, SettingChange, Settings};

use crate::commands::recipes::FilterArgs;

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Recipe to include (repeatable).
    #[arg(long = "recipe", value_name = "NAME")]
    pub recipes: Vec<String>,
    /// Include every recipe matching the filter flags.
    #[arg(long)]
    pub all: bool,
    #[command(flatten)]
    pub filter: FilterArgs,
    #[command(flatten)]
    pub overrides: SettingOverrides,
}

/// Per-run settings overrides, applied on top of the loaded settings.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingOverrides {
    /// Row width in tiles before blocks wrap.
    #[arg(long, value_name = "TILES")]
    pub max_width: Option<u32>,
    #[arg(long, value_name = "TILES")]
    pub column_spacing: Option<u32>,
    #[arg(long, value_name = "TILES")]
    pub row_spacing: Option<u32>,
    /// Inserter feeding the machine.
    #[arg(long, value_name = "NAME")]
    pub inserter: Option<String>,
    /// Inserter emptying the machine.
    #[arg(long, value_name = "NAME")]
    pub outserter: Option<String>,
    #[arg(long, value_name = "NAME")]
    pub source_chest: Option<String>,
    #[arg(long, value_name = "NAME")]
    pub target_chest: Option<String>,
    /// Maximum ingredient request, in stacks.
    #[arg(long, value_name = "STACKS")]
    pub request_stack_limit: Option<u32>,
    /// Stacks of product kept before limited inserters stop.
    #[arg(long, value_name = "STACKS")]
    pub craft_stack_limit: Option<u32>,
    #[arg(long, value_name = "BOOL")]
    pub inserter_limit: Option<bool>,
    #[arg(long, value_name = "BOOL")]
    pub outserter_limit: Option<bool>,
    /// Let the source chest pull from buffer chests.
    #[arg(long, value_name = "BOOL")]
    pub source_request_from_buffers: Option<bool>,
    #[arg(long, value_name = "BOOL")]
    pub source_trash_unrequested: Option<bool>,
    #[arg(long, value_name = "BOOL")]
    pub target_trash_unrequested: Option<bool>,
    /// Pin a product request on the target chest.
    #[arg(long, value_name = "BOOL")]
    pub target_request_filter: Option<bool>,
    /// Quality of the crafted products.
    #[arg(long, value_name = "QUALITY")]
    pub quality: Option<String>,
    /// Machine override for one category (repeatable).
    #[arg(long = "machine", value_name = "CATEGORY=MACHINE", value_parser = parse_machine)]
    pub machines: Vec<(String, String)>,
}

impl SettingOverrides {
    /// Overrides as setting changes, in a fixed order.
    pub fn changes(&self) -> Vec<SettingChange> {
        let mut changes = Vec::new();
        if let Some(v) = self.max_width {
            changes.push(SettingChange::BlueprintMaxWidth(v));
        }
        if let Some(v) = self.column_spacing {
            changes.push(SettingChange::ColumnSpacing(v));
        }
        if let Some(v) = self.row_spacing {
            changes.push(SettingChange::RowSpacing(v));
        }
        if let Some(v) = &self.inserter {
            changes.push(SettingChange::Inserter(v.clone()));
        }
        if let Some(v) = &self.outserter {
            changes.push(SettingChange::Outserter(v.clone()));
        }
        if let Some(v) = &self.source_chest {
            changes.push(SettingChange::SourceChest(v.clone()));
        }
        if let Some(v) = &self.target_chest {
            changes.push(SettingChange::TargetChest(v.clone()));
        }
        if let Some(v) = self.request_stack_limit {
            changes.push(SettingChange::RequestStackLimit(v));
        }
        if let Some(v) = self.craft_stack_limit {
            changes.push(SettingChange::CraftStackLimit(v));
        }
        if let Some(v) = self.inserter_limit {
            changes.push(SettingChange::InserterSetLimit(v));
        }
        if let Some(v) = self.outserter_limit {
            changes.push(SettingChange::OutserterSetLimit(v));
        }
        if let Some(v) = self.source_request_from_buffers {
            changes.push(SettingChange::SourceRequestFromBuffers(v));
        }
        if let Some(v) = self.source_trash_unrequested {
            changes.push(SettingChange::SourceTrashUnrequested(v));
        }
        if let Some(v) = self.target_trash_unrequested {
            changes.push(SettingChange::TargetTrashUnrequested(v));
        }
        if let Some(v) = self.target_request_filter {
            changes.push(SettingChange::TargetSetRequestFilter(v));
        }
        if let Some(v) = &self.quality {
            changes.push(SettingChange::ProductQuality(v.clone()));
        }
        for (category, machine) in &self.machines {
            changes.push(SettingChange::Machine {
                category: category.clone(),
                machine: machine.clone(),
            });
        }
        changes
    }
}

fn parse_machine(value: &str) -> std::result::Result<(String, String), String> {
    match value.split_once('=') {
        Some((category, machine)) if !category.is_empty() && !machine.is_empty() => {
            Ok((category.to_string(), machine.to_string()))
        }
        _ => Err(format!("expected CATEGORY=MACHINE, got '{value}'")),
    }
}

/// Handle the generate subcommand.
///
/// Named recipes must exist; `--all` adds every recipe passing the filter.
/// Blocks are laid out in catalog order.
pub fn handle_generate(
    catalog: Arc<Catalog>,
    settings: Settings,
    args: &GenerateArgs,
) -> Result<String> {
    let mut session = Session::new(Arc::clone(&catalog)).with_settings(settings);
    for change in args.overrides.changes() {
        session.apply(change);
    }

    for name in &args.recipes {
        let recipe = catalog
            .require_recipe(name)
            .context("failed to resolve recipe selection")?;
        session.selection.set(&recipe.name, true);
    }
    if args.all {
        for recipe in RecipeFilter::from(&args.filter).apply(&catalog) {
            session.selection.set(&recipe.name, true);
        }
    }

    debug!(selected = session.selection.len(), "generating blueprint");
    session.generate().context("failed to generate blueprint")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_override_parses_category_and_machine() {
        assert_eq!(
            parse_machine("crafting=assembling-machine-2"),
            Ok(("crafting".to_string(), "assembling-machine-2".to_string()))
        );
        assert!(parse_machine("crafting").is_err());
        assert!(parse_machine("=assembler").is_err());
    }

    #[test]
    fn overrides_become_setting_changes() {
        let overrides = SettingOverrides {
            max_width: Some(20),
            outserter_limit: Some(false),
            source_request_from_buffers: Some(false),
            source_trash_unrequested: Some(false),
            target_trash_unrequested: Some(false),
            target_request_filter: Some(false),
            machines: vec![("smelting".into(), "stone-furnace".into())],
            ..SettingOverrides::default()
        };
        let settings = Settings::default().with_changes(overrides.changes());
        assert_eq!(settings.blueprint_max_width, 20);
        assert!(!settings.outserter.set_limit);
        assert!(!settings.source_chest.request_from_buffers);
        assert!(!settings.source_chest.trash_unrequested);
        assert!(!settings.target_chest.trash_unrequested);
        assert!(!settings.target_chest.set_request_filter);
        assert_eq!(
            settings.machines.get("smelting").map(String::as_str),
            Some("stone-furnace")
        );
    }
}
