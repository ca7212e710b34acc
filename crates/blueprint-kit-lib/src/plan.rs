//! Decoded plan tree: blueprints, blueprint books and the entities they hold.
//!
//! The model follows the Factorio 2.0 blueprint JSON layout. Only the fields
//! the crate reads or writes are typed; everything else an object carries is
//! kept in its flattened `extra` map so a decode/encode cycle is lossless.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Untyped fields preserved across a decode/encode cycle.
pub type Extra = Map<String, Value>;

/// Version stamped on freshly created plans (2.0.10 packed as 4 x u16).
pub const PLAN_VERSION: u64 = (2 << 48) | (10 << 16);

/// Wire connector for the red circuit network.
pub const CIRCUIT_RED: u32 = 1;
/// Wire connector for the green circuit network.
pub const CIRCUIT_GREEN: u32 = 2;

/// Direction value for an entity facing south (16-way directions).
pub const DIRECTION_SOUTH: u8 = 8;

/// A decoded plan string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    Blueprint(Blueprint),
    BlueprintBook(BlueprintBook),
    UpgradePlanner(Value),
    DeconstructionPlanner(Value),
}

impl Plan {
    /// Human-readable kind, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Plan::Blueprint(_) => "blueprint",
            Plan::BlueprintBook(_) => "blueprint_book",
            Plan::UpgradePlanner(_) => "upgrade_planner",
            Plan::DeconstructionPlanner(_) => "deconstruction_planner",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub icons: Vec<Icon>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<Entity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiles: Vec<Tile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wires: Vec<Wire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Blueprint {
    /// An empty blueprint stamped with the current plan version.
    pub fn new() -> Self {
        Self {
            item: Some("blueprint".to_string()),
            version: Some(PLAN_VERSION),
            ..Self::default()
        }
    }

    /// Append an entity, assigning the next entity number. Returns that number.
    pub fn add_entity(&mut self, mut entity: Entity) -> u32 {
        let number = self.entities.len() as u32 + 1;
        entity.entity_number = number;
        self.entities.push(entity);
        number
    }

    /// Set icon slots 1..=n from virtual or item signals, in order.
    pub fn set_icons<I>(&mut self, signals: I)
    where
        I: IntoIterator<Item = SignalId>,
    {
        self.icons = signals
            .into_iter()
            .enumerate()
            .map(|(idx, signal)| Icon {
                signal,
                index: idx as u32 + 1,
                extra: Extra::new(),
            })
            .collect();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueprintBook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub icons: Vec<Icon>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blueprints: Vec<BookEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl BlueprintBook {
    /// A book holding `plans` in order, indexed from zero.
    pub fn with_plans<I>(plans: I) -> Self
    where
        I: IntoIterator<Item = Plan>,
    {
        Self {
            item: Some("blueprint-book".to_string()),
            blueprints: plans
                .into_iter()
                .enumerate()
                .map(|(index, plan)| BookEntry {
                    index: index as u32,
                    plan,
                })
                .collect(),
            active_index: Some(0),
            version: Some(PLAN_VERSION),
            ..Self::default()
        }
    }
}

/// One slot of a blueprint book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookEntry {
    #[serde(default)]
    pub index: u32,
    #[serde(flatten)]
    pub plan: Plan,
}

/// Map coordinates. A plain `{x, y}` pair, so any other key is dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    pub signal: SignalId,
    pub index: u32,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Reference to a signal (item, fluid, virtual, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalId {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl SignalId {
    pub fn item(name: impl Into<String>) -> Self {
        Self {
            kind: Some("item".to_string()),
            name: name.into(),
            quality: None,
            extra: Extra::new(),
        }
    }

    pub fn virtual_signal(name: impl Into<String>) -> Self {
        Self {
            kind: Some("virtual".to_string()),
            name: name.into(),
            quality: None,
            extra: Extra::new(),
        }
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = Some(quality.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub name: String,
    pub position: Position,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Circuit connection `[entity_a, connector_a, entity_b, connector_b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire(pub u32, pub u32, pub u32, pub u32);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub entity_number: u32,
    pub name: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<EntityItems>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_behavior: Option<ControlBehavior>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_filters: Option<EntityRequests>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Entity {
    /// A bare entity; the number is assigned by [`Blueprint::add_entity`].
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            entity_number: 0,
            name: name.into(),
            position,
            direction: None,
            quality: None,
            recipe: None,
            recipe_quality: None,
            items: None,
            control_behavior: None,
            request_filters: None,
            extra: Extra::new(),
        }
    }
}

/// Items an entity asks construction robots to insert (modules, fuel, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityItems {
    /// 2.0 insert plans.
    Requests(Vec<ItemRequest>),
    /// 1.x `{ "item-name": count }` map.
    Legacy(BTreeMap<String, u64>),
}

impl EntityItems {
    /// Iterate `(item name, count)` pairs regardless of the encoding.
    pub fn counts(&self) -> Vec<(&str, u64)> {
        match self {
            EntityItems::Requests(requests) => requests
                .iter()
                .map(|request| (request.id.name.as_str(), request.count()))
                .collect(),
            EntityItems::Legacy(map) => map
                .iter()
                .map(|(name, count)| (name.as_str(), *count))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRequest {
    pub id: ItemId,
    #[serde(default)]
    pub items: ItemPlacement,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ItemRequest {
    /// Total items placed across every inventory position.
    pub fn count(&self) -> u64 {
        self.items
            .in_inventory
            .iter()
            .map(|slot| u64::from(slot.count.unwrap_or(1)))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemId {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPlacement {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub in_inventory: Vec<InventoryPosition>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryPosition {
    pub inventory: u32,
    pub stack: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "≤")]
    LessOrEqual,
    #[serde(rename = "≥")]
    GreaterOrEqual,
    #[serde(rename = "≠")]
    NotEqual,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlBehavior {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<SectionList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logistic_condition: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_to_logistic_network: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_mode_of_operation: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_condition_enabled: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Constant combinator signal sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionList {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub index: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Section {
    /// Section `index` holding `filters`, renumbered from 1.
    pub fn numbered(index: u32, filters: impl IntoIterator<Item = Filter>) -> Self {
        Self {
            index,
            filters: filters
                .into_iter()
                .enumerate()
                .map(|(idx, filter)| Filter {
                    index: idx as u32 + 1,
                    ..filter
                })
                .collect(),
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub index: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparator: Option<Comparator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Filter {
    /// `name == count` filter for an item of the given quality.
    pub fn equals(name: impl Into<String>, quality: impl Into<String>, count: i64) -> Self {
        Self {
            index: 0,
            name: name.into(),
            quality: Some(quality.into()),
            comparator: Some(Comparator::Equal),
            count: Some(count),
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_signal: Option<SignalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_signal: Option<SignalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparator: Option<Comparator>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Logistic requests of a chest, in either encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRequests {
    /// 2.0 sectioned requests.
    Sections(RequestFilters),
    /// 1.x flat filter list.
    Legacy(Vec<Value>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestFilters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_from_buffers: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trash_not_requested: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}
