//! Session state transitions and sentinel outputs.

use std::fs;
use std::sync::Arc;

use blueprint_kit_lib::aggregate::DEFAULT_REMAP;
use blueprint_kit_lib::codec::{decode_plan, encode_plan};
use blueprint_kit_lib::plan::Plan;
use blueprint_kit_lib::selection::{RecipeFilter, SelectionState};
use blueprint_kit_lib::session::{
    convert_or_empty, decode_to_json_or_sentinel, encode_from_json_or_sentinel, Session,
    INVALID_BLUEPRINT, INVALID_JSON,
};
use blueprint_kit_lib::settings::SettingChange;
use blueprint_kit_lib::signals::SignalOptions;
use blueprint_kit_lib::Error;

mod common;

fn session() -> Session {
    Session::new(Arc::new(common::fixture_catalog()))
}

fn fixture_text() -> String {
    fs::read_to_string(common::fixture_catalog_path()).expect("read fixture")
}

#[test]
fn selection_follows_catalog_order() {
    let mut session = session();
    session.selection.set("widget", true);
    session.selection.set("gear", true);
    session.selection.set("not-a-recipe", true);
    let ordered: Vec<&str> = session
        .selection
        .ordered(session.catalog())
        .into_iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(ordered, ["gear", "widget"]);
}

#[test]
fn filters_narrow_and_toggle_all() {
    let mut session = session();
    let catalog = Arc::clone(session.catalog());
    let filter = RecipeFilter {
        group: "intermediate".into(),
        ..RecipeFilter::default()
    };
    let visible = filter.apply(&catalog);
    assert_eq!(visible.len(), 3);
    assert_eq!(session.selection.state(&visible), SelectionState::None);

    session.selection.toggle("gear");
    assert_eq!(session.selection.state(&visible), SelectionState::Partial);

    session.selection.toggle_all(&visible);
    assert_eq!(session.selection.state(&visible), SelectionState::All);
    session.selection.toggle_all(&visible);
    assert!(session.selection.is_empty());

    let search = RecipeFilter {
        search: "Gear".into(),
        ..RecipeFilter::default()
    };
    let found: Vec<&str> = search.apply(&catalog).iter().map(|r| r.name.as_str()).collect();
    assert_eq!(found, ["gear"]);
}

#[test]
fn recompute_generates_for_the_selection() {
    let mut session = session();
    session.selection.set("vent-gas", true);
    let output = session.recompute();
    match decode_plan(&output).expect("decode") {
        Plan::Blueprint(blueprint) => assert_eq!(blueprint.entities.len(), 3),
        other => panic!("unexpected plan: {:?}", other),
    }
}

#[test]
fn recompute_fails_to_empty_output() {
    let mut session = session();
    session.selection.set("gear", true);
    session.apply(SettingChange::Inserter("missing-inserter".into()));
    assert!(session.generate().is_err());
    assert_eq!(session.recompute(), "");
}

#[test]
fn huge_column_spacing_still_recomputes() {
    let mut session = session();
    session.selection.set("gear", true);
    session.selection.set("widget", true);
    session.apply(SettingChange::ColumnSpacing(u32::MAX));
    let output = session.recompute();
    match decode_plan(&output).expect("decode") {
        Plan::Blueprint(blueprint) => assert_eq!(blueprint.entities.len(), 10),
        other => panic!("unexpected plan: {:?}", other),
    }
}

#[test]
fn coordinate_overflow_recomputes_to_empty_output() {
    let mut session = session();
    session.selection.set("gear", true);
    session.selection.set("widget", true);
    session.apply(SettingChange::BlueprintMaxWidth(3));
    session.apply(SettingChange::RowSpacing(u32::MAX));
    match session.generate() {
        Err(Error::LayoutOverflow { recipe }) => assert_eq!(recipe, "widget"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(session.recompute(), "");
}

#[test]
fn machine_selection_is_recorded_per_category() {
    let mut session = session();
    session.select_machine("crafting", "burner-assembler");
    session.selection.set("gear", true);
    match decode_plan(&session.recompute()).expect("decode") {
        Plan::Blueprint(blueprint) => assert_eq!(blueprint.entities[0].name, "burner-assembler"),
        other => panic!("unexpected plan: {:?}", other),
    }
}

#[test]
fn failed_import_keeps_previous_catalog() {
    let mut session = session();
    session.selection.set("gear", true);
    let before = Arc::clone(session.catalog());

    assert!(session.import_catalog("{\"recipes\": oops").is_err());
    assert!(Arc::ptr_eq(&before, session.catalog()));
    assert!(session.selection.is_selected("gear"));
}

#[test]
fn successful_import_replaces_catalog_and_clears_selection() {
    let mut session = session();
    session.selection.set("gear", true);
    let before = Arc::clone(session.catalog());

    session.import_catalog(&fixture_text()).expect("import fixture");
    assert!(!Arc::ptr_eq(&before, session.catalog()));
    assert_eq!(session.catalog().as_ref(), before.as_ref());
    assert!(session.selection.is_empty());
}

#[test]
fn sentinels_replace_failed_conversions() {
    assert_eq!(decode_to_json_or_sentinel("not a plan"), INVALID_BLUEPRINT);
    assert_eq!(encode_from_json_or_sentinel("{"), INVALID_JSON);
    assert_eq!(
        convert_or_empty("", &DEFAULT_REMAP, &SignalOptions::default()),
        ""
    );
}

#[test]
fn sentinel_helpers_pass_successes_through() {
    let plan = Plan::Blueprint(common::blueprint_of(&["pipe"]));
    let encoded = encode_plan(&plan).expect("encode");
    let json = decode_to_json_or_sentinel(&encoded);
    assert_ne!(json, INVALID_BLUEPRINT);
    let reencoded = encode_from_json_or_sentinel(&json);
    assert_eq!(decode_plan(&reencoded).expect("decode"), plan);
    assert!(!convert_or_empty(&encoded, &DEFAULT_REMAP, &SignalOptions::default()).is_empty());
}
