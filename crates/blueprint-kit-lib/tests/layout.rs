//! Production block layout against the fixture catalog.

use blueprint_kit_lib::catalog::Catalog;
use blueprint_kit_lib::codec::decode_plan;
use blueprint_kit_lib::layout::{
    generate_blueprint, layout_blueprint, Footprint, GridCursor, BLUEPRINT_LABEL, UNLIMITED_REQUEST,
};
use blueprint_kit_lib::plan::{
    Blueprint, Comparator, Entity, EntityRequests, Plan, Position, RequestFilters, DIRECTION_SOUTH,
};
use blueprint_kit_lib::settings::{SettingChange, Settings};
use blueprint_kit_lib::Error;
use proptest::prelude::*;

mod common;

fn generate(catalog: &Catalog, recipes: &[&str], settings: &Settings) -> Blueprint {
    let names: Vec<String> = recipes.iter().map(|name| name.to_string()).collect();
    let plan_string = generate_blueprint(&names, settings, catalog).expect("generate blueprint");
    match decode_plan(&plan_string).expect("decode generated plan") {
        Plan::Blueprint(blueprint) => blueprint,
        other => panic!("unexpected plan: {:?}", other),
    }
}

fn requests(entity: &Entity) -> &RequestFilters {
    match entity.request_filters.as_ref() {
        Some(EntityRequests::Sections(filters)) => filters,
        other => panic!("unexpected request filters on {}: {:?}", entity.name, other),
    }
}

fn machines(blueprint: &Blueprint) -> Vec<(&str, Position)> {
    blueprint
        .entities
        .iter()
        .filter(|entity| entity.recipe.is_some())
        .map(|entity| (entity.name.as_str(), entity.position))
        .collect()
}

#[test]
fn single_block_has_five_entities_in_order() {
    let catalog = common::fixture_catalog();
    let blueprint = generate(&catalog, &["widget"], &Settings::default());

    let placed: Vec<(u32, &str, Position)> = blueprint
        .entities
        .iter()
        .map(|e| (e.entity_number, e.name.as_str(), e.position))
        .collect();
    assert_eq!(
        placed,
        [
            (1, "turbo-assembler", Position::new(1.5, 1.5)),
            (2, "bulk-inserter", Position::new(0.5, 3.5)),
            (3, "bulk-inserter", Position::new(1.5, 3.5)),
            (4, "requester-chest", Position::new(0.5, 4.5)),
            (5, "buffer-chest", Position::new(1.5, 4.5)),
        ]
    );
    assert_eq!(blueprint.entities[0].recipe.as_deref(), Some("widget"));
    assert_eq!(blueprint.entities[1].direction, Some(DIRECTION_SOUTH));
    assert_eq!(blueprint.label.as_deref(), Some(BLUEPRINT_LABEL));
}

#[test]
fn ingredient_request_scales_with_machine_speed() {
    let catalog = common::fixture_catalog();
    let blueprint = generate(&catalog, &["widget"], &Settings::default());

    // 1 * 1 * 4 / 2 = 2 gizmo parts.
    let source = requests(&blueprint.entities[3]);
    let filter = &source.sections[0].filters[0];
    assert_eq!(filter.name, "gizmo-part");
    assert_eq!(filter.count, Some(2));
    assert_eq!(filter.comparator, Some(Comparator::Equal));
    assert_eq!(source.request_from_buffers, Some(true));
    assert_eq!(source.trash_not_requested, Some(true));
}

#[test]
fn target_chest_requests_the_product() {
    let catalog = common::fixture_catalog();
    let blueprint = generate(&catalog, &["widget"], &Settings::default());
    let target = requests(&blueprint.entities[4]);
    let filter = &target.sections[0].filters[0];
    assert_eq!(filter.name, "widget");
    assert_eq!(filter.count, Some(UNLIMITED_REQUEST));

    let settings = Settings::default().with_change(SettingChange::TargetSetRequestFilter(false));
    let bare = generate(&catalog, &["widget"], &settings);
    assert!(bare.entities[4].request_filters.is_none());
}

#[test]
fn outserter_stops_at_product_threshold() {
    let catalog = common::fixture_catalog();
    let settings = Settings::default().with_change(SettingChange::ProductQuality("rare".into()));
    let blueprint = generate(&catalog, &["widget"], &settings);

    assert!(blueprint.entities[1].control_behavior.is_none());
    let behavior = blueprint.entities[2]
        .control_behavior
        .as_ref()
        .expect("outserter is limited");
    let condition = behavior.logistic_condition.as_ref().expect("condition");
    let signal = condition.first_signal.as_ref().expect("signal");
    assert_eq!(signal.name, "widget");
    assert_eq!(signal.quality.as_deref(), Some("rare"));
    // 50 per stack * 4 stacks.
    assert_eq!(condition.constant, Some(200));
    assert_eq!(condition.comparator, Some(Comparator::LessThan));
    assert_eq!(behavior.connect_to_logistic_network, Some(true));
    assert_eq!(blueprint.entities[0].recipe_quality.as_deref(), Some("rare"));
}

#[test]
fn inserter_limit_is_configurable() {
    let catalog = common::fixture_catalog();
    let settings = Settings::default().with_changes([
        SettingChange::InserterSetLimit(true),
        SettingChange::OutserterSetLimit(false),
    ]);
    let blueprint = generate(&catalog, &["gear"], &settings);
    assert!(blueprint.entities[1].control_behavior.is_some());
    assert!(blueprint.entities[2].control_behavior.is_none());
}

#[test]
fn recipes_without_ingredients_skip_the_input_side() {
    let catalog = common::fixture_catalog();
    let blueprint = generate(&catalog, &["vent-gas"], &Settings::default());
    let names: Vec<&str> = blueprint.entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["chem-plant", "bulk-inserter", "buffer-chest"]);
    assert_eq!(blueprint.entities[1].position, Position::new(1.5, 3.5));
}

#[test]
fn empty_selection_yields_an_empty_blueprint() {
    let catalog = common::fixture_catalog();
    let blueprint = generate(&catalog, &[], &Settings::default());
    assert!(blueprint.entities.is_empty());
    assert_eq!(blueprint.label.as_deref(), Some(BLUEPRINT_LABEL));
}

#[test]
fn blocks_wrap_onto_new_rows() {
    let catalog = common::fixture_catalog();
    let settings = Settings::default().with_change(SettingChange::BlueprintMaxWidth(6));
    let blueprint = generate(&catalog, &["gear", "widget", "vent-gas"], &settings);
    assert_eq!(
        machines(&blueprint),
        [
            ("fast-assembler", Position::new(1.5, 1.5)),
            ("turbo-assembler", Position::new(4.5, 1.5)),
            ("chem-plant", Position::new(1.5, 6.5)),
        ]
    );
}

#[test]
fn spacing_is_added_between_blocks() {
    let catalog = common::fixture_catalog();
    let settings = Settings::default().with_changes([
        SettingChange::BlueprintMaxWidth(7),
        SettingChange::ColumnSpacing(1),
        SettingChange::RowSpacing(2),
    ]);
    let blueprint = generate(&catalog, &["gear", "widget", "vent-gas"], &settings);
    assert_eq!(
        machines(&blueprint),
        [
            ("fast-assembler", Position::new(1.5, 1.5)),
            ("turbo-assembler", Position::new(5.5, 1.5)),
            ("chem-plant", Position::new(1.5, 8.5)),
        ]
    );
}

#[test]
fn oversized_block_gets_its_own_row() {
    let catalog = common::fixture_catalog();
    let blueprint = generate(&catalog, &["press-plate", "gear"], &Settings::default());
    assert_eq!(
        machines(&blueprint),
        [
            ("mega-press", Position::new(7.0, 3.0)),
            ("fast-assembler", Position::new(1.5, 9.5)),
        ]
    );
}

#[test]
fn saturated_column_spacing_wraps_instead_of_overflowing() {
    let catalog = common::fixture_catalog();
    let settings = Settings::default().with_changes([
        SettingChange::BlueprintMaxWidth(u32::MAX),
        SettingChange::ColumnSpacing(u32::MAX - 3),
    ]);
    let blueprint = generate(&catalog, &["gear", "widget"], &settings);
    assert_eq!(
        machines(&blueprint),
        [
            ("fast-assembler", Position::new(1.5, 1.5)),
            ("turbo-assembler", Position::new(1.5, 6.5)),
        ]
    );
}

#[test]
fn rows_past_the_coordinate_range_fail_generation() {
    let catalog = common::fixture_catalog();
    let settings = Settings::default().with_changes([
        SettingChange::BlueprintMaxWidth(3),
        SettingChange::RowSpacing(u32::MAX),
    ]);
    let names = vec!["gear".to_string(), "widget".to_string()];
    match generate_blueprint(&names, &settings, &catalog) {
        Err(Error::LayoutOverflow { recipe }) => assert_eq!(recipe, "widget"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn generation_is_byte_identical_across_runs() {
    let catalog = common::fixture_catalog();
    let settings = Settings::default().with_changes([
        SettingChange::BlueprintMaxWidth(6),
        SettingChange::InserterSetLimit(true),
    ]);
    let names: Vec<String> = ["gear", "widget", "vent-gas", "press-plate"]
        .iter()
        .map(|name| name.to_string())
        .collect();
    let first = generate_blueprint(&names, &settings, &catalog).expect("first run");
    let second = generate_blueprint(&names, &settings, &catalog).expect("second run");
    assert_eq!(first, second);
}

#[test]
fn wide_source_chest_widens_the_block() {
    let catalog = common::fixture_catalog();
    let settings = Settings::default().with_change(SettingChange::SourceChest("wide-requester".into()));
    let blueprint = generate(&catalog, &["gear"], &settings);
    let positions: Vec<(&str, Position)> = blueprint
        .entities
        .iter()
        .map(|e| (e.name.as_str(), e.position))
        .collect();
    assert_eq!(
        positions,
        [
            ("fast-assembler", Position::new(1.5, 1.5)),
            ("bulk-inserter", Position::new(0.5, 3.5)),
            ("bulk-inserter", Position::new(2.5, 3.5)),
            ("wide-requester", Position::new(1.0, 5.0)),
            ("buffer-chest", Position::new(2.5, 4.5)),
        ]
    );
}

#[test]
fn machine_override_changes_machine_and_requests() {
    let catalog = common::fixture_catalog();
    let default = generate(&catalog, &["gear"], &Settings::default());
    assert_eq!(
        requests(&default.entities[3]).sections[0].filters[0].count,
        Some(30)
    );

    let settings = Settings::default().with_change(SettingChange::Machine {
        category: "crafting".into(),
        machine: "assembler".into(),
    });
    let slow = generate(&catalog, &["gear"], &settings);
    assert_eq!(slow.entities[0].name, "assembler");
    // 2 * 10 * 0.5 / 0.5 = 20 iron plates.
    assert_eq!(requests(&slow.entities[3]).sections[0].filters[0].count, Some(20));
}

#[test]
fn override_outside_the_category_is_rejected() {
    let catalog = common::fixture_catalog();
    let settings = Settings::default().with_change(SettingChange::Machine {
        category: "crafting".into(),
        machine: "turbo-assembler".into(),
    });
    let names = vec!["gear".to_string()];
    match generate_blueprint(&names, &settings, &catalog) {
        Err(Error::MachineNotFound { machine, category }) => {
            assert_eq!(machine, "turbo-assembler");
            assert_eq!(category, "crafting");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn unknown_inserter_fails_with_its_name() {
    let catalog = common::fixture_catalog();
    let settings = Settings::default().with_change(SettingChange::Inserter("bulk-inserterr".into()));
    let names = vec!["gear".to_string()];
    match generate_blueprint(&names, &settings, &catalog) {
        Err(Error::InserterNotFound { name, suggestions }) => {
            assert_eq!(name, "bulk-inserterr");
            assert_eq!(suggestions.first().map(String::as_str), Some("bulk-inserter"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn unknown_chests_and_outserter_are_reported() {
    let catalog = common::fixture_catalog();
    let cases = [
        SettingChange::Outserter("teleporter".into()),
        SettingChange::SourceChest("void-chest".into()),
        SettingChange::TargetChest("void-chest".into()),
    ];
    for change in cases {
        let settings = Settings::default().with_change(change);
        let err = layout_blueprint(&[], &catalog, &settings).expect_err("missing entity");
        assert!(
            matches!(
                err,
                Error::OutserterNotFound { .. }
                    | Error::SourceChestNotFound { .. }
                    | Error::TargetChestNotFound { .. }
            ),
            "unexpected error: {:?}",
            err
        );
    }
}

#[test]
fn unknown_recipe_name_fails_generation() {
    let catalog = common::fixture_catalog();
    let names = vec!["gear".to_string(), "gizmo".to_string()];
    assert!(matches!(
        generate_blueprint(&names, &Settings::default(), &catalog),
        Err(Error::UnknownRecipe { .. })
    ));
}

proptest! {
    #[test]
    fn placed_blocks_stay_within_max_width(
        footprints in prop::collection::vec((1u32..20, 1u32..10), 0..30),
        max_width in 1u32..40,
        column_spacing in 0u32..3,
        row_spacing in 0u32..3,
    ) {
        let mut cursor = GridCursor::default();
        let mut previous = (0u32, 0u32);
        for (width, height) in footprints {
            let footprint = Footprint { width, height };
            let (x, y) = cursor
                .place(footprint, max_width, row_spacing)
                .expect("small grid never overflows");
            prop_assert!(
                x + width <= max_width || x == 0,
                "block at x={} width={} max={}",
                x,
                width,
                max_width
            );
            prop_assert!(y > previous.1 || (y == previous.1 && x >= previous.0));
            previous = (x, y);
            cursor.advance(footprint, column_spacing);
        }
    }
}
