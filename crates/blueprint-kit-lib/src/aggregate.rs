//! Build-cost aggregation over a plan tree.
//!
//! Entities and tiles are resolved through a [`RemapTable`] to the item that
//! places them. Names the table does not know count as their own item, once.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::plan::{Blueprint, BlueprintBook, Plan};

/// Item (and count) that places one entity or tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remap {
    pub item: String,
    pub count: u64,
}

/// Lookup from entity/tile name to the item that builds it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapTable {
    entries: HashMap<String, Remap>,
}

impl RemapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the mapping for `name`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, item: impl Into<String>, count: u64) -> Self {
        self.entries.insert(
            name.into(),
            Remap {
                item: item.into(),
                count,
            },
        );
        self
    }

    /// Resolve a name to `(item, count)`, passing unknown names through at 1.
    pub fn resolve<'a>(&'a self, name: &'a str) -> (&'a str, u64) {
        match self.entries.get(name) {
            Some(remap) => (remap.item.as_str(), remap.count),
            None => (name, 1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `(entity or tile, item, count)` for everything not placed by its own item.
const DEFAULT_REMAPS: &[(&str, &str, u64)] = &[
    ("chute-miniloader-inserter", "chute-miniloader", 1),
    ("concrete-wall-ruin", "concrete-wall", 1),
    ("curved-rail", "rail", 4),
    ("express-filter-miniloader-inserter", "express-filter-miniloader", 1),
    ("express-miniloader-inserter", "express-miniloader", 1),
    ("fast-filter-miniloader-inserter", "fast-filter-miniloader", 1),
    ("fast-miniloader-inserter", "fast-miniloader", 1),
    ("filter-miniloader-inserter", "filter-miniloader", 1),
    ("furnace-ruin", "stone-furnace", 1),
    ("hazard-concrete-left", "hazard-concrete", 1),
    ("hazard-concrete-right", "hazard-concrete", 1),
    ("iron-wood-chest", "iron-chest", 1),
    ("iron-wood-chest-remnants", "iron-chest", 1),
    ("miniloader-inserter", "miniloader", 1),
    ("railloader-chest", "railloader", 1),
    ("railloader-placement-proxy", "railloader", 1),
    ("railunloader-chest", "railunloader", 1),
    ("railunloader-placement-proxy", "railunloader", 1),
    ("refined-hazard-concrete-left", "refined-hazard-concrete", 1),
    ("refined-hazard-concrete-right", "refined-hazard-concrete", 1),
    ("rough-stone-path", "stone", 1),
    ("se-core-miner-drill", "se-core-miner", 1),
    ("se-fuel-refinery-spaced", "se-fuel-refinery", 1),
    ("se-meteor-defence-container", "se-meteor-defence", 1),
    ("se-meteor-point-defence-container", "se-meteor-point-defence", 1),
    ("se-pylon-construction-radar-radar", "se-pylon-construction-radar", 1),
    ("se-pylon-construction-radar-roboport", "se-pylon-construction-radar", 1),
    ("se-pylon-construction-roboport", "se-pylon-construction", 1),
    ("se-space-assembling-machine-grounded", "se-space-assembling-machine", 1),
    ("se-space-biochemical-laboratory-grounded", "se-space-biochemical-laboratory", 1),
    ("se-space-capsule-_-vehicle", "se-space-capsule", 1),
    ("se-space-curved-rail", "se-space-rail", 4),
    ("se-space-decontamination-facility-grounded", "se-space-decontamination-facility", 1),
    ("se-space-hypercooler-grounded", "se-space-hypercooler", 1),
    ("se-space-laser-laboratory-grounded", "se-space-laser-laboratory", 1),
    ("se-space-manufactory-grounded", "se-space-manufactory", 1),
    ("se-space-mechanical-laboratory-grounded", "se-space-mechanical-laboratory", 1),
    ("se-space-particle-accelerator-grounded", "se-space-particle-accelerator", 1),
    ("se-space-radiation-laboratory-grounded", "se-space-radiation-laboratory", 1),
    ("se-space-radiator-2-grounded", "se-space-radiator-2", 1),
    ("se-space-radiator-grounded", "se-space-radiator", 1),
    ("se-space-straight-rail", "se-space-rail", 1),
    ("se-space-supercomputer-1-grounded", "se-space-supercomputer-1", 1),
    ("se-space-supercomputer-2-grounded", "se-space-supercomputer-2", 1),
    ("se-space-supercomputer-3-grounded", "se-space-supercomputer-3", 1),
    ("se-space-supercomputer-4-grounded", "se-space-supercomputer-4", 1),
    ("se-space-thermodynamics-laboratory-grounded", "se-space-thermodynamics-laboratory", 1),
    ("se-spaceship-clamp-place", "se-spaceship-clamp", 1),
    ("se-spaceship-console-output", "se-struct-generic-output", 1),
    ("space-filter-miniloader-inserter", "space-filter-miniloader", 1),
    ("space-miniloader-inserter", "space-miniloader", 1),
    ("steel-wall-ruin", "steel-wall", 1),
    ("stone-path", "stone-brick", 1),
    ("stone-rubble", "stone-wall", 1),
    ("stone-wall-ruin", "stone-wall", 1),
    ("straight-rail", "rail", 1),
    ("vase", "wood", 1),
    ("wood-half-chest-left", "wooden-chest", 1),
    ("wood-half-chest-right", "wooden-chest", 1),
    ("wooden-barrel", "wood", 1),
    ("workshop-ruin", "assembling-machine-1", 1),
];

/// Remap table covering vanilla rails and tiles plus common mod leftovers.
pub static DEFAULT_REMAP: Lazy<RemapTable> = Lazy::new(|| {
    DEFAULT_REMAPS
        .iter()
        .fold(RemapTable::new(), |table, (name, item, count)| {
            table.with(*name, *item, *count)
        })
});

/// Item counts in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregatedItems {
    entries: Vec<(String, u64)>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl AggregatedItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` of `name`. Zero counts never create an entry.
    pub fn add(&mut self, name: &str, count: u64) {
        if count == 0 {
            return;
        }
        match self.index.get(name) {
            Some(&position) => self.entries[position].1 += count,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), count));
            }
        }
    }

    /// Sum `other` into this aggregation, appending names it has not seen.
    pub fn merge(&mut self, other: &AggregatedItems) {
        for (name, count) in &other.entries {
            self.add(name, *count);
        }
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.index.get(name).map(|&position| self.entries[position].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn as_slice(&self) -> &[(String, u64)] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<(String, u64)> {
        self.entries
    }
}

/// Count every item needed to build `plan`, recursing into books.
pub fn aggregate_items(plan: &Plan, table: &RemapTable) -> AggregatedItems {
    let mut items = AggregatedItems::new();
    visit_plan(plan, table, &mut items);
    items
}

fn visit_plan(plan: &Plan, table: &RemapTable, items: &mut AggregatedItems) {
    match plan {
        Plan::Blueprint(blueprint) => visit_blueprint(blueprint, table, items),
        Plan::BlueprintBook(book) => visit_book(book, table, items),
        Plan::UpgradePlanner(_) | Plan::DeconstructionPlanner(_) => {}
    }
}

fn visit_book(book: &BlueprintBook, table: &RemapTable, items: &mut AggregatedItems) {
    for entry in &book.blueprints {
        visit_plan(&entry.plan, table, items);
    }
}

fn visit_blueprint(blueprint: &Blueprint, table: &RemapTable, items: &mut AggregatedItems) {
    for entity in &blueprint.entities {
        let (item, count) = table.resolve(&entity.name);
        items.add(item, count);
        if let Some(modules) = &entity.items {
            for (module, count) in modules.counts() {
                items.add(module, count);
            }
        }
    }
    for tile in &blueprint.tiles {
        let (item, count) = table.resolve(&tile.name);
        items.add(item, count);
    }
}
