use std::path::PathBuf;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::serde_helpers::{opt_u64_from_str_or_num, strings_from_str_or_seq};

/// Where Steam lives when the user didn't pick a directory.
pub static DEFAULT_STEAM_DIR: Lazy<PathBuf> = Lazy::new(|| {
    if cfg!(windows) {
        PathBuf::from("C:/Program Files (x86)/Steam")
    } else {
        directories::BaseDirs::new()
            .map(|b| b.data_dir().join("Steam"))
            .unwrap_or_else(|| PathBuf::from(".local/share/Steam"))
    }
});

/// Custom directory if non-blank (trailing separators stripped), else the default.
pub fn effective_install_dir(custom: Option<&str>) -> PathBuf {
    let Some(raw) = custom.map(str::trim).filter(|s| !s.is_empty()) else {
        return DEFAULT_STEAM_DIR.clone();
    };
    let trimmed = raw.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        // "/" or "\" on its own
        PathBuf::from(raw)
    } else {
        PathBuf::from(trimmed)
    }
}

/// Per-control settings as persisted by the Stream Deck.
///
/// Unknown keys are kept in `extra` so writing back never drops property
/// inspector state we don't model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlSettings {
    #[serde(default, deserialize_with = "strings_from_str_or_seq")]
    pub filteroptions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_steam_dir: Option<String>,
    #[serde(
        default,
        deserialize_with = "opt_u64_from_str_or_num",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_scroll_index: Option<u64>,
    #[serde(
        default,
        deserialize_with = "opt_u64_from_str_or_num",
        skip_serializing_if = "Option::is_none"
    )]
    pub page_index: Option<u64>,
    #[serde(
        default,
        deserialize_with = "opt_u64_from_str_or_num",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_keys: Option<u64>,
    #[serde(
        default,
        deserialize_with = "opt_u64_from_str_or_num",
        skip_serializing_if = "Option::is_none"
    )]
    pub button_index: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ControlSettings {
    /// Parse from a borrowed settings map
    pub fn from_map(map: &Map<String, Value>) -> serde_json::Result<Self> {
        serde_json::from_value(Value::Object(map.clone()))
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }

    pub fn install_dir(&self) -> PathBuf {
        effective_install_dir(self.custom_steam_dir.as_deref())
    }
}
