/// Preset wire shape — the slice of the admin API's preset object the
/// decoration engine consumes.
///
/// The full preset carries schema-driven form fields the engine never
/// looks at; only the identifiers, the level tag, and the optional
/// per-level weight override under `meta` are modeled here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub account_id: String,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub meta: PresetMeta,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresetMeta {
    /// Optional per-level weight tables overriding the catalog defaults,
    /// keyed by level tag then variant key.
    #[serde(default)]
    pub structure_weights: Option<HashMap<String, HashMap<String, f64>>>,
}

fn default_level() -> String {
    "L0".to_string()
}

impl Preset {
    pub fn new(
        id: impl Into<String>,
        account_id: impl Into<String>,
        level: impl Into<String>,
    ) -> Preset {
        Preset {
            id: id.into(),
            account_id: account_id.into(),
            level: level.into(),
            meta: PresetMeta::default(),
        }
    }

    /// The preset's own weight table for a level, if one was configured.
    pub fn weights_for(&self, level: &str) -> Option<&HashMap<String, f64>> {
        self.meta.structure_weights.as_ref()?.get(level)
    }
}
