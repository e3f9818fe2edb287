/// Variant catalog — per-pack configuration of structure variants.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One named structure template eligible for injection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub block: String,
}

/// Read-only configuration for one (content-pack, pack-version): the
/// variant set, the payload field to inject into, and default weight
/// tables keyed by level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantCatalog {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub inject_target: String,
    #[serde(default)]
    pub variants: HashMap<String, Variant>,
    #[serde(default)]
    pub default_weights: HashMap<String, HashMap<String, f64>>,
}

impl VariantCatalog {
    /// Load a catalog from a JSON file.
    pub fn load_from_json(path: &Path) -> Result<VariantCatalog, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_json(&contents)
    }

    /// Parse a catalog from a JSON string.
    pub fn parse_json(input: &str) -> Result<VariantCatalog, CatalogError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Whether decoration should run at all. A catalog that is disabled,
    /// has no variants, or names no injection target is skipped outright.
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.variants.is_empty() && !self.inject_target.is_empty()
    }

    /// Deterministic fallback key: the lexicographically first declared
    /// variant, so the choice never depends on map iteration order.
    pub fn first_key(&self) -> Option<&str> {
        self.variants.keys().map(String::as_str).min()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.variants.contains_key(key)
    }

    /// The text block for a variant key, if declared.
    pub fn block(&self, key: &str) -> Option<&str> {
        self.variants.get(key).map(|v| v.block.as_str())
    }

    /// The catalog-wide default weight table for a level, if any.
    pub fn default_weights_for(&self, level: &str) -> Option<&HashMap<String, f64>> {
        self.default_weights.get(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_JSON: &str = r#"{
        "enabled": true,
        "inject_target": "instructions",
        "variants": {
            "hook_first": { "block": "Open with the hook." },
            "story_arc": { "block": "Tell it as a short story." }
        },
        "default_weights": {
            "L0": { "hook_first": 0.7, "story_arc": 0.3 }
        }
    }"#;

    #[test]
    fn parse_catalog_json() {
        let catalog = VariantCatalog::parse_json(CATALOG_JSON).unwrap();
        assert!(catalog.enabled);
        assert_eq!(catalog.inject_target, "instructions");
        assert_eq!(catalog.variants.len(), 2);
        assert_eq!(catalog.block("hook_first"), Some("Open with the hook."));
        assert_eq!(
            catalog.default_weights_for("L0").unwrap()["story_arc"],
            0.3
        );
        assert!(catalog.default_weights_for("L5").is_none());
    }

    #[test]
    fn missing_fields_default() {
        let catalog = VariantCatalog::parse_json("{}").unwrap();
        assert!(!catalog.enabled);
        assert!(catalog.variants.is_empty());
        assert!(!catalog.is_usable());
    }

    #[test]
    fn usable_requires_enabled_variants_and_target() {
        let mut catalog = VariantCatalog::parse_json(CATALOG_JSON).unwrap();
        assert!(catalog.is_usable());

        catalog.enabled = false;
        assert!(!catalog.is_usable());

        catalog.enabled = true;
        catalog.variants.clear();
        assert!(!catalog.is_usable());

        let mut catalog = VariantCatalog::parse_json(CATALOG_JSON).unwrap();
        catalog.inject_target.clear();
        assert!(!catalog.is_usable());
    }

    #[test]
    fn first_key_is_lexicographic() {
        let catalog = VariantCatalog::parse_json(CATALOG_JSON).unwrap();
        assert_eq!(catalog.first_key(), Some("hook_first"));

        let empty = VariantCatalog::default();
        assert_eq!(empty.first_key(), None);
    }

    #[test]
    fn parse_rejects_malformed_json() {
        assert!(VariantCatalog::parse_json("{ not json").is_err());
    }

    #[test]
    fn load_test_catalog_from_file() {
        let path = std::path::PathBuf::from("tests/fixtures/test_catalog.json");
        let catalog = VariantCatalog::load_from_json(&path).unwrap();
        assert!(catalog.is_usable());
        assert!(catalog.contains_key("hook_first"));
    }
}
