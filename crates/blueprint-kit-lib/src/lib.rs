//! blueprint-kit library entry points.
//!
//! Two directions share this crate. Forward, a [`Catalog`] of recipes and
//! buildings plus [`Settings`] become a "make everything" blueprint via the
//! grid layout engine. Reverse, an existing plan string is aggregated into a
//! build-cost list and packed into constant-combinator signals. Both end in
//! the plan string codec. Higher-level consumers (the CLI) should only use
//! the functions exported here.

pub mod aggregate;
pub mod catalog;
pub mod codec;
pub mod error;
pub mod layout;
pub mod plan;
pub mod selection;
pub mod session;
pub mod settings;
pub mod signals;
pub mod source;
pub mod vanilla;

pub use aggregate::{aggregate_items, AggregatedItems, RemapTable, DEFAULT_REMAP};
pub use catalog::{
    best_crafting_machine, Catalog, Category, CraftingMachine, Inserter, LogisticContainer,
    LogisticMode, Recipe, EXPORT_COMMAND,
};
pub use codec::{decode_plan, decode_to_json, encode_from_json, encode_plan};
pub use error::{Error, Result};
pub use layout::{generate_blueprint, layout_blueprint, product_threshold, request_count};
pub use plan::{Blueprint, BlueprintBook, Entity, Plan};
pub use selection::{RecipeFilter, RecipeSelection, SelectionState};
pub use session::Session;
pub use settings::{SettingChange, Settings};
pub use signals::{chunk, convert_blueprint_to_signals, SignalOptions};
