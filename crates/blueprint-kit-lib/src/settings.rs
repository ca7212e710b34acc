//! Generator settings.
//!
//! Every field has a default, and a settings file may specify any subset.
//! Individual edits go through [`Settings::with_change`], which maps one
//! complete settings value to the next.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Row width in tiles before blocks wrap onto the next row.
    pub blueprint_max_width: u32,
    pub column_spacing: u32,
    pub row_spacing: u32,
    pub source_chest: SourceChestSettings,
    pub target_chest: TargetChestSettings,
    pub inserter: InserterSettings,
    pub outserter: InserterSettings,
    /// Stacks of finished product allowed before the limited inserters stop.
    pub craft_stack_limit: u32,
    pub product_quality: String,
    /// Per-category machine overrides (`category -> machine`).
    pub machines: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            blueprint_max_width: 12,
            column_spacing: 0,
            row_spacing: 0,
            source_chest: SourceChestSettings::default(),
            target_chest: TargetChestSettings::default(),
            inserter: InserterSettings {
                name: "bulk-inserter".to_string(),
                set_limit: false,
            },
            outserter: InserterSettings {
                name: "bulk-inserter".to_string(),
                set_limit: true,
            },
            craft_stack_limit: 4,
            product_quality: "normal".to_string(),
            machines: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceChestSettings {
    pub name: String,
    pub request_from_buffers: bool,
    pub trash_unrequested: bool,
    /// Upper bound for a single ingredient request, in stacks.
    pub request_stack_limit: u32,
}

impl Default for SourceChestSettings {
    fn default() -> Self {
        Self {
            name: "requester-chest".to_string(),
            request_from_buffers: true,
            trash_unrequested: true,
            request_stack_limit: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetChestSettings {
    pub name: String,
    pub trash_unrequested: bool,
    pub set_request_filter: bool,
}

impl Default for TargetChestSettings {
    fn default() -> Self {
        Self {
            name: "buffer-chest".to_string(),
            trash_unrequested: true,
            set_request_filter: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InserterSettings {
    pub name: String,
    /// Attach the "product count below threshold" logistic condition.
    pub set_limit: bool,
}

/// A single user edit to [`Settings`].
#[derive(Debug, Clone, PartialEq)]
pub enum SettingChange {
    BlueprintMaxWidth(u32),
    ColumnSpacing(u32),
    RowSpacing(u32),
    SourceChest(String),
    SourceRequestFromBuffers(bool),
    SourceTrashUnrequested(bool),
    RequestStackLimit(u32),
    TargetChest(String),
    TargetTrashUnrequested(bool),
    TargetSetRequestFilter(bool),
    Inserter(String),
    InserterSetLimit(bool),
    Outserter(String),
    OutserterSetLimit(bool),
    CraftStackLimit(u32),
    ProductQuality(String),
    Machine { category: String, machine: String },
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&text).map_err(|source| Error::SettingsParse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Apply one edit, returning the complete new settings.
    #[must_use]
    pub fn with_change(mut self, change: SettingChange) -> Self {
        match change {
            SettingChange::BlueprintMaxWidth(v) => self.blueprint_max_width = v,
            SettingChange::ColumnSpacing(v) => self.column_spacing = v,
            SettingChange::RowSpacing(v) => self.row_spacing = v,
            SettingChange::SourceChest(v) => self.source_chest.name = v,
            SettingChange::SourceRequestFromBuffers(v) => self.source_chest.request_from_buffers = v,
            SettingChange::SourceTrashUnrequested(v) => self.source_chest.trash_unrequested = v,
            SettingChange::RequestStackLimit(v) => self.source_chest.request_stack_limit = v,
            SettingChange::TargetChest(v) => self.target_chest.name = v,
            SettingChange::TargetTrashUnrequested(v) => self.target_chest.trash_unrequested = v,
            SettingChange::TargetSetRequestFilter(v) => self.target_chest.set_request_filter = v,
            SettingChange::Inserter(v) => self.inserter.name = v,
            SettingChange::InserterSetLimit(v) => self.inserter.set_limit = v,
            SettingChange::Outserter(v) => self.outserter.name = v,
            SettingChange::OutserterSetLimit(v) => self.outserter.set_limit = v,
            SettingChange::CraftStackLimit(v) => self.craft_stack_limit = v,
            SettingChange::ProductQuality(v) => self.product_quality = v,
            SettingChange::Machine { category, machine } => {
                self.machines.insert(category, machine);
            }
        }
        self
    }

    /// Fold a sequence of edits over these settings.
    #[must_use]
    pub fn with_changes(self, changes: impl IntoIterator<Item = SettingChange>) -> Self {
        changes.into_iter().fold(self, Settings::with_change)
    }
}
