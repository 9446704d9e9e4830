use crate::models::paths::{DESCRIPTOR_EXTENSION, LOAD_ORDER_PREFIX};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference to a package by its descriptor file name, e.g. `2217534250.mod`.
#[derive(Serialize, Deserialize, Display, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct ModRef(String);

impl ModRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Parses a load order entry (`mod/<descriptor>`). The bare prefix yields `None`.
    pub fn from_load_order_key(key: &str) -> Option<Self> {
        let path = key.strip_prefix(LOAD_ORDER_PREFIX).unwrap_or(key).trim();
        (!path.is_empty()).then(|| Self(path.to_string()))
    }

    pub fn load_order_key(&self) -> String {
        format!("{LOAD_ORDER_PREFIX}{}", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_descriptor(&self) -> bool {
        self.0
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext == DESCRIPTOR_EXTENSION)
    }

    /// Name of the content folder: the descriptor name without its extension.
    pub fn folder_name(&self) -> &str {
        self.0
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.0)
    }
}

/// One package discovered in the mods directory.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Mod {
    pub id: String,
    pub name: Option<String>,
    pub version: Option<String>,
    pub path: ModRef,
    pub comment: String,
    pub attributes: BTreeMap<String, String>,
}

impl Mod {
    pub fn from_attributes(path: ModRef, attributes: BTreeMap<String, String>) -> Self {
        Self {
            id: path.folder_name().to_string(),
            name: attributes.get("name").cloned(),
            version: attributes.get("version").cloned(),
            path,
            comment: String::new(),
            attributes,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModState {
    Active,
    /// Keeps its slot in the load order but is not loaded by the game.
    TemporarilyDisabled,
    Disabled,
}

/// Read model row handed to the presentation layer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ModEntry {
    pub id: String,
    pub name: Option<String>,
    pub version: Option<String>,
    pub comment: String,
    pub path: ModRef,
    pub state: ModState,
}
