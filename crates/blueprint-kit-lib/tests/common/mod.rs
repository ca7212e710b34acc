//! Shared fixtures for the library integration tests.

use std::path::PathBuf;

use blueprint_kit_lib::catalog::Catalog;
use blueprint_kit_lib::plan::{Blueprint, Entity, Extra, Position, Tile};

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Path to the small hand-written catalog export.
#[allow(dead_code)]
pub fn fixture_catalog_path() -> PathBuf {
    fixtures_dir().join("test_catalog.meg")
}

#[allow(dead_code)]
pub fn fixture_catalog() -> Catalog {
    Catalog::from_path(&fixture_catalog_path()).expect("load fixture test_catalog.meg")
}

/// Blueprint with one entity per name, laid out along the x axis.
#[allow(dead_code)]
pub fn blueprint_of(names: &[&str]) -> Blueprint {
    let mut blueprint = Blueprint::new();
    for (i, name) in names.iter().enumerate() {
        blueprint.add_entity(Entity::new(*name, Position::new(i as f64 + 0.5, 0.5)));
    }
    blueprint
}

#[allow(dead_code)]
pub fn tile(name: &str, x: f64, y: f64) -> Tile {
    Tile {
        name: name.to_string(),
        position: Position::new(x, y),
        extra: Extra::new(),
    }
}
