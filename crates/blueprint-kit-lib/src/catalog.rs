//! Normalized, display-ready catalog of recipes and buildings.
//!
//! A [`Catalog`] is built once per data source (the embedded vanilla data or
//! an imported export file) and never mutated afterwards. Callers swap the
//! whole catalog when the source changes.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{suggest, Error, Result};
use crate::source::{Locale, SourceData, SourceGroup, SourceItem};

/// Separator between the JSON document and the locale block of an export file.
pub const EXPORT_SEPARATOR: &str = "\n\n";

/// Stack size assumed for items the catalog does not list.
pub const DEFAULT_STACK_SIZE: u32 = 1;

/// In-game console command that writes an export file for the current game.
pub const EXPORT_COMMAND: &str = include_str!("../data/export-command.lua");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub name: String,
    pub display_name: String,
    pub category: String,
    pub order: String,
    pub energy: f64,
    pub group_name: String,
    pub group_display_name: String,
    pub subgroup_name: String,
    pub request_paste_multiplier: f64,
    pub main_product: String,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CraftingMachine {
    pub name: String,
    pub display_name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub crafting_categories: Vec<String>,
    pub crafting_speed: f64,
    pub is_burner: bool,
}

impl CraftingMachine {
    pub fn can_craft(&self, category: &str) -> bool {
        self.crafting_categories.iter().any(|c| c == category)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inserter {
    pub name: String,
    pub display_name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub pickup_position: Option<[f64; 2]>,
    pub drop_position: Option<[f64; 2]>,
}

/// Role of a storage entity in the logistic network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogisticMode {
    ActiveProvider,
    PassiveProvider,
    Storage,
    Buffer,
    Requester,
}

impl LogisticMode {
    pub const ALL: [LogisticMode; 5] = [
        LogisticMode::ActiveProvider,
        LogisticMode::PassiveProvider,
        LogisticMode::Storage,
        LogisticMode::Buffer,
        LogisticMode::Requester,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogisticMode::ActiveProvider => "active-provider",
            LogisticMode::PassiveProvider => "passive-provider",
            LogisticMode::Storage => "storage",
            LogisticMode::Buffer => "buffer",
            LogisticMode::Requester => "requester",
        }
    }

    /// Modes that can hold requests, i.e. usable as a source chest.
    pub fn requests_items(self) -> bool {
        matches!(self, LogisticMode::Buffer | LogisticMode::Requester)
    }
}

impl fmt::Display for LogisticMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogisticMode {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        LogisticMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogisticContainer {
    pub name: String,
    pub display_name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub logistic_mode: LogisticMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub name: String,
    pub order: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quality {
    pub name: String,
    pub display_name: String,
}

/// A recipe category with the machines able to craft it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub name: String,
    pub machines: Vec<CraftingMachine>,
    /// Default machine; empty when no machine can craft the category.
    pub selected_machine: String,
}

impl Category {
    pub fn machine(&self, name: &str) -> Option<&CraftingMachine> {
        self.machines.iter().find(|machine| machine.name == name)
    }
}

/// Pick the default machine for a category.
///
/// Any electric machine beats any burner machine. Among machines of the same
/// kind the higher crafting speed wins, and the first seen wins a tie.
pub fn best_crafting_machine(machines: &[CraftingMachine]) -> Option<&CraftingMachine> {
    let mut best: Option<&CraftingMachine> = None;
    for machine in machines {
        best = match best {
            None => Some(machine),
            Some(current) if current.is_burner && !machine.is_burner => Some(machine),
            Some(current)
                if current.is_burner == machine.is_burner
                    && machine.crafting_speed > current.crafting_speed =>
            {
                Some(machine)
            }
            keep => keep,
        };
    }
    best
}

/// Immutable per-load snapshot of everything the generators read.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub recipes: Vec<Recipe>,
    pub items: Vec<SourceItem>,
    pub crafting_machines: Vec<CraftingMachine>,
    pub inserters: Vec<Inserter>,
    pub logistic_containers: Vec<LogisticContainer>,
    pub groups: Vec<Group>,
    pub subgroups: Vec<SourceGroup>,
    pub qualities: Vec<Quality>,
    pub categories: Vec<Category>,
    source: SourceData,
    locale: Locale,
}

impl Catalog {
    /// Normalize a raw dataset against its locale strings.
    pub fn from_source(source: SourceData, locale: Locale) -> Result<Self> {
        let logistic_containers = source
            .logistic_containers
            .iter()
            .map(|container| {
                let logistic_mode = container.logistic_mode.parse::<LogisticMode>().map_err(
                    |()| Error::UnknownLogisticMode {
                        container: container.name.clone(),
                        mode: container.logistic_mode.clone(),
                    },
                )?;
                Ok(LogisticContainer {
                    name: container.name.clone(),
                    display_name: locale.display_name("logistic_containers", &container.name),
                    tile_width: container.tile_width,
                    tile_height: container.tile_height,
                    logistic_mode,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let recipes: Vec<Recipe> = source
            .recipes
            .iter()
            .map(|recipe| Recipe {
                name: recipe.name.clone(),
                display_name: locale.display_name("recipes", &recipe.name),
                category: recipe.category.clone(),
                order: recipe.order.clone(),
                energy: recipe.energy,
                group_name: recipe.group_name.clone(),
                group_display_name: locale.display_name("groups", &recipe.group_name),
                subgroup_name: recipe.subgroup_name.clone(),
                request_paste_multiplier: recipe.request_paste_multiplier,
                main_product: recipe.main_product.clone(),
                ingredients: recipe
                    .ingredients
                    .iter()
                    .map(|ingredient| Ingredient {
                        name: ingredient.name.clone(),
                        amount: ingredient.amount,
                    })
                    .collect(),
            })
            .collect();

        let crafting_machines: Vec<CraftingMachine> = source
            .crafting_machines
            .iter()
            .map(|machine| CraftingMachine {
                name: machine.name.clone(),
                display_name: locale.display_name("crafting_machines", &machine.name),
                tile_width: machine.tile_width,
                tile_height: machine.tile_height,
                crafting_categories: machine.crafting_categories.clone(),
                crafting_speed: machine.crafting_speed,
                is_burner: machine.is_burner,
            })
            .collect();

        let category_names: BTreeSet<&str> =
            recipes.iter().map(|recipe| recipe.category.as_str()).collect();
        let categories = category_names
            .into_iter()
            .map(|name| {
                let machines: Vec<CraftingMachine> = crafting_machines
                    .iter()
                    .filter(|machine| machine.can_craft(name))
                    .cloned()
                    .collect();
                let selected_machine = best_crafting_machine(&machines)
                    .map(|machine| machine.name.clone())
                    .unwrap_or_default();
                debug!(category = name, selected = %selected_machine, "resolved default machine");
                Category {
                    name: name.to_string(),
                    machines,
                    selected_machine,
                }
            })
            .collect();

        let catalog = Self {
            recipes,
            items: source.items.clone(),
            crafting_machines,
            inserters: source
                .inserters
                .iter()
                .map(|inserter| Inserter {
                    name: inserter.name.clone(),
                    display_name: locale.display_name("inserters", &inserter.name),
                    tile_width: inserter.tile_width,
                    tile_height: inserter.tile_height,
                    pickup_position: inserter.inserter_pickup_position,
                    drop_position: inserter.inserter_drop_position,
                })
                .collect(),
            logistic_containers,
            groups: source
                .groups
                .iter()
                .map(|group| Group {
                    name: group.name.clone(),
                    order: group.order.clone(),
                    display_name: locale.display_name("groups", &group.name),
                })
                .collect(),
            subgroups: source.subgroups.clone(),
            qualities: source
                .qualities
                .iter()
                .map(|quality| Quality {
                    name: quality.name.clone(),
                    display_name: locale.display_name("qualities", &quality.name),
                })
                .collect(),
            categories,
            source,
            locale,
        };

        info!(
            recipes = catalog.recipes.len(),
            machines = catalog.crafting_machines.len(),
            categories = catalog.categories.len(),
            locale_entries = catalog.locale.len(),
            "catalog normalized"
        );
        Ok(catalog)
    }

    /// Parse an export file: JSON, a blank line, then locale lines.
    ///
    /// Nothing is returned unless the whole text parses and normalizes.
    pub fn from_export_text(text: &str) -> Result<Self> {
        let (json, locale) = text.split_once(EXPORT_SEPARATOR).unwrap_or((text, ""));
        let source = SourceData::from_json(json).map_err(|source| Error::CatalogJson { source })?;
        Self::from_source(source, Locale::parse(locale))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        debug!(path = %path.display(), bytes = text.len(), "loading catalog export");
        Self::from_export_text(&text)
    }

    /// Re-emit the export format this catalog was built from.
    pub fn to_export_text(&self) -> Result<String> {
        let json =
            serde_json::to_string(&self.source).map_err(|source| Error::CatalogJson { source })?;
        Ok(format!("{json}{EXPORT_SEPARATOR}{}", self.locale.to_text()))
    }

    pub fn source(&self) -> &SourceData {
        &self.source
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn recipe(&self, name: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.name == name)
    }

    /// Resolve a recipe, suggesting close names when absent.
    pub fn require_recipe(&self, name: &str) -> Result<&Recipe> {
        self.recipe(name).ok_or_else(|| Error::UnknownRecipe {
            name: name.to_string(),
            suggestions: suggest(name, self.recipes.iter().map(|r| r.name.as_str())),
        })
    }

    pub fn item(&self, name: &str) -> Option<&SourceItem> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Stack size of an item, [`DEFAULT_STACK_SIZE`] when unknown.
    pub fn stack_size(&self, name: &str) -> u32 {
        self.item(name)
            .map(|item| item.stack_size)
            .unwrap_or(DEFAULT_STACK_SIZE)
    }

    pub fn inserter(&self, name: &str) -> Option<&Inserter> {
        self.inserters.iter().find(|inserter| inserter.name == name)
    }

    pub fn logistic_container(&self, name: &str) -> Option<&LogisticContainer> {
        self.logistic_containers
            .iter()
            .find(|container| container.name == name)
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    pub fn quality(&self, name: &str) -> Option<&Quality> {
        self.qualities.iter().find(|quality| quality.name == name)
    }

    /// Containers whose logistic mode satisfies `accept`, in dataset order.
    pub fn containers_with_modes(
        &self,
        accept: impl Fn(LogisticMode) -> bool,
    ) -> Vec<&LogisticContainer> {
        self.logistic_containers
            .iter()
            .filter(|container| accept(container.logistic_mode))
            .collect()
    }

    pub(crate) fn inserter_suggestions(&self, name: &str) -> Vec<String> {
        suggest(name, self.inserters.iter().map(|i| i.name.as_str()))
    }

    pub(crate) fn container_suggestions(&self, name: &str) -> Vec<String> {
        suggest(name, self.logistic_containers.iter().map(|c| c.name.as_str()))
    }
}
