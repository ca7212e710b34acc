//! Raw source dataset as written by the in-game export command.
//!
//! The game's JSON writer turns an empty Lua table into `{}`, so every list
//! field accepts any non-array value (or a missing key) as an empty list.

use std::collections::HashMap;

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceData {
    #[serde(default, deserialize_with = "lua_list")]
    pub recipes: Vec<SourceRecipe>,
    #[serde(default, deserialize_with = "lua_list")]
    pub items: Vec<SourceItem>,
    #[serde(default, deserialize_with = "lua_list")]
    pub crafting_machines: Vec<SourceCraftingMachine>,
    #[serde(default, deserialize_with = "lua_list")]
    pub inserters: Vec<SourceInserter>,
    #[serde(default, deserialize_with = "lua_list")]
    pub logistic_containers: Vec<SourceLogisticContainer>,
    #[serde(default, deserialize_with = "lua_list")]
    pub groups: Vec<SourceGroup>,
    #[serde(default, deserialize_with = "lua_list")]
    pub subgroups: Vec<SourceGroup>,
    #[serde(default, deserialize_with = "lua_list")]
    pub qualities: Vec<SourceQuality>,
}

impl SourceData {
    /// Parse the JSON half of a catalog export.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecipe {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub order: String,
    pub energy: f64,
    #[serde(default)]
    pub group_name: String,
    #[serde(default)]
    pub subgroup_name: String,
    #[serde(default = "default_paste_multiplier")]
    pub request_paste_multiplier: f64,
    pub main_product: String,
    #[serde(default, deserialize_with = "lua_list")]
    pub ingredients: Vec<SourceIngredient>,
}

fn default_paste_multiplier() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceIngredient {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceItem {
    pub name: String,
    pub stack_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCraftingMachine {
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    #[serde(default, deserialize_with = "lua_list")]
    pub crafting_categories: Vec<String>,
    pub crafting_speed: f64,
    #[serde(default)]
    pub is_burner: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInserter {
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserter_pickup_position: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserter_drop_position: Option<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLogisticContainer {
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub logistic_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceGroup {
    pub name: String,
    #[serde(default)]
    pub order: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceQuality {
    pub name: String,
}

/// Accept a JSON array of `T`, treating any other value as an empty list.
fn lua_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(values) => values
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(D::Error::custom))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

/// Locale strings keyed by `<list-key>.<name>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Locale {
    entries: HashMap<String, String>,
    order: Vec<String>,
}

impl Locale {
    /// Parse `key=value` lines. The first `=` splits key from value and the
    /// first line for a key wins.
    pub fn parse(text: &str) -> Self {
        let mut locale = Self::default();
        for line in text.lines() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if key.is_empty() || locale.entries.contains_key(key) {
                continue;
            }
            locale.order.push(key.to_string());
            locale.entries.insert(key.to_string(), value.to_string());
        }
        locale
    }

    /// Non-empty localised text for `<list_key>.<name>`.
    pub fn get(&self, list_key: &str, name: &str) -> Option<&str> {
        self.entries
            .get(&format!("{list_key}.{name}"))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Localised text, falling back to the raw name.
    pub fn display_name(&self, list_key: &str, name: &str) -> String {
        self.get(list_key, name).unwrap_or(name).to_string()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Render back to `key=value` lines in first-seen order.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for key in &self.order {
            if let Some(value) = self.entries.get(key) {
                text.push_str(key);
                text.push('=');
                text.push_str(value);
                text.push('\n');
            }
        }
        text
    }
}
