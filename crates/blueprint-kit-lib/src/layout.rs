//! Grid layout of production blocks ("make everything" mall generator).
//!
//! Each selected recipe becomes one block:
//!
//! ```text
//! +-----------------+
//! |     machine     |
//! +--------+--------+
//! |inserter|outserter
//! | source | target |
//! +--------+--------+
//! ```
//!
//! Blocks are placed left to right and wrap onto a new row once the next
//! block would cross the configured maximum width.

use tracing::{debug, info};

use crate::catalog::{Catalog, CraftingMachine, Inserter, LogisticContainer, Recipe};
use crate::codec::encode_plan;
use crate::error::{Error, Result};
use crate::plan::{
    Blueprint, Comparator, Condition, ControlBehavior, Entity, EntityRequests, Filter, Plan,
    Position, RequestFilters, Section, SignalId, DIRECTION_SOUTH,
};
use crate::settings::Settings;

pub const BLUEPRINT_LABEL: &str = "Make Everything";
pub const BLUEPRINT_DESCRIPTION: &str =
    "One production block per recipe: machine, inserters, requester and provider chest.";

/// Request count pinned on the target chest; effectively unlimited buffering.
pub const UNLIMITED_REQUEST: i64 = 1_000_000;

/// Tile footprint of one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub width: u32,
    pub height: u32,
}

/// Row-major placement cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridCursor {
    pub x: u32,
    pub y: u32,
    pub row_max_height: u32,
}

impl GridCursor {
    /// Reserve room for `footprint` and return its top-left corner.
    ///
    /// A block that does not fit starts a new row unless the row is empty,
    /// so an oversized block still gets placed, alone, at x = 0. Returns
    /// `None`, leaving the cursor untouched, when the block would reach past
    /// `u32::MAX` on either axis.
    pub fn place(
        &mut self,
        footprint: Footprint,
        max_width: u32,
        row_spacing: u32,
    ) -> Option<(u32, u32)> {
        let fits = self
            .x
            .checked_add(footprint.width)
            .is_some_and(|right| right <= max_width);
        let (x, y, row_max_height) = if !fits && self.x != 0 {
            let y = self.y.checked_add(self.row_max_height)?.checked_add(row_spacing)?;
            (0, y, 0)
        } else {
            (self.x, self.y, self.row_max_height)
        };
        x.checked_add(footprint.width)?;
        y.checked_add(footprint.height)?;

        self.x = x;
        self.y = y;
        self.row_max_height = row_max_height.max(footprint.height);
        Some((x, y))
    }

    /// Move past a placed block.
    ///
    /// Saturates at `u32::MAX`, which forces the next block onto a new row.
    pub fn advance(&mut self, footprint: Footprint, column_spacing: u32) {
        self.x = self
            .x
            .saturating_add(footprint.width)
            .saturating_add(column_spacing);
    }
}

/// Ingredient request for the source chest.
///
/// At least one craft's worth, scaled by the machine's crafting speed, but
/// never more than `stack_limit` stacks and never below 1.
pub fn request_count(
    amount: f64,
    paste_multiplier: f64,
    crafting_speed: f64,
    energy: f64,
    stack_size: u32,
    stack_limit: u32,
) -> i64 {
    let rate_based = amount * paste_multiplier * crafting_speed / energy;
    let requested = amount.max(rate_based);
    let limited = (f64::from(stack_size) * f64::from(stack_limit)).min(requested);
    (limited.floor() as i64).max(1)
}

/// Product count at which limited inserters stop.
pub fn product_threshold(stack_size: u32, craft_stack_limit: u32) -> i64 {
    i64::from(stack_size) * i64::from(craft_stack_limit)
}

/// Entities shared by every block, resolved once up front.
#[derive(Debug, Clone, Copy)]
struct BlockKit<'a> {
    inserter: &'a Inserter,
    outserter: &'a Inserter,
    source_chest: &'a LogisticContainer,
    target_chest: &'a LogisticContainer,
}

impl<'a> BlockKit<'a> {
    fn resolve(catalog: &'a Catalog, settings: &Settings) -> Result<Self> {
        let inserter = catalog.inserter(&settings.inserter.name).ok_or_else(|| {
            Error::InserterNotFound {
                name: settings.inserter.name.clone(),
                suggestions: catalog.inserter_suggestions(&settings.inserter.name),
            }
        })?;
        let outserter = catalog.inserter(&settings.outserter.name).ok_or_else(|| {
            Error::OutserterNotFound {
                name: settings.outserter.name.clone(),
                suggestions: catalog.inserter_suggestions(&settings.outserter.name),
            }
        })?;
        let source_chest = catalog
            .logistic_container(&settings.source_chest.name)
            .ok_or_else(|| Error::SourceChestNotFound {
                name: settings.source_chest.name.clone(),
                suggestions: catalog.container_suggestions(&settings.source_chest.name),
            })?;
        let target_chest = catalog
            .logistic_container(&settings.target_chest.name)
            .ok_or_else(|| Error::TargetChestNotFound {
                name: settings.target_chest.name.clone(),
                suggestions: catalog.container_suggestions(&settings.target_chest.name),
            })?;
        Ok(Self {
            inserter,
            outserter,
            source_chest,
            target_chest,
        })
    }

    /// Width of the inserter/source-chest column.
    fn left_width(&self) -> u32 {
        self.inserter.tile_width.max(self.source_chest.tile_width)
    }

    /// `None` when the summed entity sizes leave the u32 range.
    fn footprint(&self, machine: &CraftingMachine) -> Option<Footprint> {
        let right_width = self.outserter.tile_width.max(self.target_chest.tile_width);
        let left_column = self.inserter.tile_height.checked_add(self.source_chest.tile_height)?;
        let right_column = self
            .outserter
            .tile_height
            .checked_add(self.target_chest.tile_height)?;
        Some(Footprint {
            width: machine
                .tile_width
                .max(self.left_width().checked_add(right_width)?),
            height: machine.tile_height.checked_add(left_column.max(right_column))?,
        })
    }
}

/// A recipe paired with the machine that will craft it.
#[derive(Debug, Clone, Copy)]
struct Block<'a> {
    recipe: &'a Recipe,
    machine: &'a CraftingMachine,
}

fn resolve_machine<'a>(
    catalog: &'a Catalog,
    settings: &Settings,
    recipe: &Recipe,
) -> Result<&'a CraftingMachine> {
    let category = catalog
        .category(&recipe.category)
        .ok_or_else(|| Error::CategoryNotFound {
            category: recipe.category.clone(),
            recipe: recipe.name.clone(),
        })?;
    let selected = settings
        .machines
        .get(&category.name)
        .unwrap_or(&category.selected_machine);
    category
        .machine(selected)
        .ok_or_else(|| Error::MachineNotFound {
            machine: selected.clone(),
            category: category.name.clone(),
        })
}

/// Lay out one block per recipe, in order.
///
/// Every catalog reference is resolved before the first entity is placed;
/// any missing one fails the whole layout.
pub fn layout_blueprint(recipes: &[&Recipe], catalog: &Catalog, settings: &Settings) -> Result<Blueprint> {
    let kit = BlockKit::resolve(catalog, settings)?;
    let blocks = recipes
        .iter()
        .map(|&recipe| {
            resolve_machine(catalog, settings, recipe).map(|machine| Block { recipe, machine })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut blueprint = Blueprint::new();
    blueprint.label = Some(BLUEPRINT_LABEL.to_string());
    blueprint.description = Some(BLUEPRINT_DESCRIPTION.to_string());
    blueprint.set_icons([
        SignalId::virtual_signal("signal-M"),
        SignalId::virtual_signal("signal-E"),
    ]);

    let mut cursor = GridCursor::default();
    for block in &blocks {
        let overflow = || Error::LayoutOverflow {
            recipe: block.recipe.name.clone(),
        };
        let footprint = kit.footprint(block.machine).ok_or_else(overflow)?;
        let (x, y) = cursor
            .place(footprint, settings.blueprint_max_width, settings.row_spacing)
            .ok_or_else(overflow)?;
        debug!(
            recipe = %block.recipe.name,
            machine = %block.machine.name,
            x,
            y,
            width = footprint.width,
            height = footprint.height,
            "placing block"
        );
        place_block(&mut blueprint, block, &kit, catalog, settings, x, y);
        cursor.advance(footprint, settings.column_spacing);
    }

    info!(
        blocks = blocks.len(),
        entities = blueprint.entities.len(),
        "laid out production blocks"
    );
    Ok(blueprint)
}

/// Centre of an entity whose top-left corner sits at (x + dx, y + dy).
///
/// Summed in f64, where every u32 total is exact.
fn centered(x: u32, y: u32, dx: u32, dy: u32, width: u32, height: u32) -> Position {
    Position::new(
        f64::from(x) + f64::from(dx) + f64::from(width) / 2.0,
        f64::from(y) + f64::from(dy) + f64::from(height) / 2.0,
    )
}

fn product_limit(recipe: &Recipe, catalog: &Catalog, settings: &Settings) -> ControlBehavior {
    ControlBehavior {
        logistic_condition: Some(Condition {
            first_signal: Some(
                SignalId::item(recipe.main_product.as_str())
                    .with_quality(settings.product_quality.as_str()),
            ),
            constant: Some(product_threshold(
                catalog.stack_size(&recipe.main_product),
                settings.craft_stack_limit,
            )),
            comparator: Some(Comparator::LessThan),
            ..Condition::default()
        }),
        connect_to_logistic_network: Some(true),
        ..ControlBehavior::default()
    }
}

fn place_block(
    blueprint: &mut Blueprint,
    block: &Block<'_>,
    kit: &BlockKit<'_>,
    catalog: &Catalog,
    settings: &Settings,
    x: u32,
    y: u32,
) {
    let Block { recipe, machine } = *block;
    let has_ingredients = !recipe.ingredients.is_empty();
    let quality = settings.product_quality.as_str();
    let below = machine.tile_height;

    let mut machine_entity = Entity::new(
        machine.name.as_str(),
        centered(x, y, 0, 0, machine.tile_width, machine.tile_height),
    );
    machine_entity.recipe = Some(recipe.name.clone());
    machine_entity.recipe_quality = Some(quality.to_string());
    blueprint.add_entity(machine_entity);

    if has_ingredients {
        let inserter = kit.inserter;
        let mut entity = Entity::new(
            settings.inserter.name.as_str(),
            centered(x, y, 0, below, inserter.tile_width, inserter.tile_height),
        );
        entity.direction = Some(DIRECTION_SOUTH);
        if settings.inserter.set_limit {
            entity.control_behavior = Some(product_limit(recipe, catalog, settings));
        }
        blueprint.add_entity(entity);
    }

    let outserter = kit.outserter;
    let mut entity = Entity::new(
        settings.outserter.name.as_str(),
        centered(x, y, kit.left_width(), below, outserter.tile_width, outserter.tile_height),
    );
    if settings.outserter.set_limit {
        entity.control_behavior = Some(product_limit(recipe, catalog, settings));
    }
    blueprint.add_entity(entity);

    if has_ingredients {
        let chest = kit.source_chest;
        let mut entity = Entity::new(
            settings.source_chest.name.as_str(),
            centered(
                x,
                y,
                0,
                below.saturating_add(kit.inserter.tile_height),
                chest.tile_width,
                chest.tile_height,
            ),
        );
        let filters = recipe.ingredients.iter().map(|ingredient| {
            Filter::equals(
                ingredient.name.as_str(),
                quality,
                request_count(
                    ingredient.amount,
                    recipe.request_paste_multiplier,
                    machine.crafting_speed,
                    recipe.energy,
                    catalog.stack_size(&ingredient.name),
                    settings.source_chest.request_stack_limit,
                ),
            )
        });
        entity.request_filters = Some(EntityRequests::Sections(RequestFilters {
            sections: vec![Section::numbered(1, filters)],
            request_from_buffers: Some(settings.source_chest.request_from_buffers),
            trash_not_requested: Some(settings.source_chest.trash_unrequested),
            ..RequestFilters::default()
        }));
        blueprint.add_entity(entity);
    }

    let chest = kit.target_chest;
    let mut entity = Entity::new(
        settings.target_chest.name.as_str(),
        centered(
            x,
            y,
            kit.left_width(),
            below.saturating_add(outserter.tile_height),
            chest.tile_width,
            chest.tile_height,
        ),
    );
    if settings.target_chest.set_request_filter {
        entity.request_filters = Some(EntityRequests::Sections(RequestFilters {
            sections: vec![Section::numbered(
                1,
                [Filter::equals(recipe.main_product.as_str(), quality, UNLIMITED_REQUEST)],
            )],
            trash_not_requested: Some(settings.target_chest.trash_unrequested),
            ..RequestFilters::default()
        }));
    }
    blueprint.add_entity(entity);
}

/// Generate the blueprint string for the named recipes, in the given order.
pub fn generate_blueprint(
    recipe_names: &[String],
    settings: &Settings,
    catalog: &Catalog,
) -> Result<String> {
    let recipes = recipe_names
        .iter()
        .map(|name| catalog.require_recipe(name))
        .collect::<Result<Vec<_>>>()?;
    let blueprint = layout_blueprint(&recipes, catalog, settings)?;
    encode_plan(&Plan::Blueprint(blueprint))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDE: Footprint = Footprint {
        width: 5,
        height: 4,
    };

    #[test]
    fn request_count_scales_with_crafting_speed() {
        // 1 * 1 * 4 / 2 = 2, above one craft, below 3 stacks of 50.
        assert_eq!(request_count(1.0, 1.0, 4.0, 2.0, 50, 3), 2);
    }

    #[test]
    fn request_count_is_capped_by_stacks_and_floored_at_one() {
        assert_eq!(request_count(10.0, 30.0, 1.25, 0.5, 100, 3), 300);
        assert_eq!(request_count(0.5, 1.0, 0.5, 10.0, 100, 3), 1);
        assert_eq!(request_count(5.0, 1.0, 1.0, 10.0, 1, 0), 1);
    }

    #[test]
    fn request_count_never_below_one_craft() {
        // Rate-based 2 * 1 * 0.5 / 10 = 0.1 < amount 2.
        assert_eq!(request_count(2.0, 1.0, 0.5, 10.0, 100, 3), 2);
    }

    #[test]
    fn threshold_multiplies_stacks() {
        assert_eq!(product_threshold(50, 4), 200);
    }

    #[test]
    fn cursor_wraps_when_the_next_block_overflows() {
        let mut cursor = GridCursor::default();
        let first = cursor.place(WIDE, 12, 1);
        cursor.advance(WIDE, 0);
        let second = cursor.place(WIDE, 12, 1);
        cursor.advance(WIDE, 0);
        let third = cursor.place(WIDE, 12, 1);
        assert_eq!(
            [first, second, third],
            [Some((0, 0)), Some((5, 0)), Some((0, 5))]
        );
    }

    #[test]
    fn oversized_block_starts_its_own_row() {
        let mut cursor = GridCursor::default();
        let huge = Footprint {
            width: 20,
            height: 2,
        };
        assert_eq!(cursor.place(huge, 12, 0), Some((0, 0)));
        cursor.advance(huge, 0);
        assert_eq!(cursor.place(WIDE, 12, 0), Some((0, 2)));
    }

    #[test]
    fn saturated_column_forces_a_new_row() {
        let mut cursor = GridCursor::default();
        assert_eq!(cursor.place(WIDE, u32::MAX, 0), Some((0, 0)));
        cursor.advance(WIDE, u32::MAX - 3);
        assert_eq!(cursor.x, u32::MAX);
        assert_eq!(cursor.place(WIDE, u32::MAX, 0), Some((0, 4)));
    }

    #[test]
    fn row_past_the_coordinate_range_is_refused() {
        let mut cursor = GridCursor::default();
        assert_eq!(cursor.place(WIDE, 6, u32::MAX), Some((0, 0)));
        cursor.advance(WIDE, 0);
        let before = cursor;
        assert_eq!(cursor.place(WIDE, 6, u32::MAX), None);
        assert_eq!(cursor, before);
    }
}
