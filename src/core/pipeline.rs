/// The decoration pipeline: Resolve → Seed → Hash → Pick → Guard →
/// Compose, one linear pass per invocation.
///
/// The pipeline never fails past its own boundary. Configuration that
/// is absent or disabled skips decoration and passes the payload
/// through unchanged; store faults degrade to a fixed sequence and an
/// empty history; a picked key missing from the catalog falls back to
/// the catalog's first declared key. The only side effects are the
/// counter and history writes through the injected store.

use serde_json::Value;
use std::path::Path;

use crate::core::compose;
use crate::core::guard;
use crate::core::hash::unit_interval;
use crate::core::picker;
use crate::core::seed::SelectionContext;
use crate::core::store::{self, StateStore};
use crate::core::weights;
use crate::schema::catalog::{CatalogError, VariantCatalog};
use crate::schema::preset::Preset;

/// The resolved choice for one decoration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub key: String,
    /// The day-scoped sequence number consumed by this attempt.
    pub sequence: u64,
    /// Whether the anti-repetition guard ran its single re-sample.
    pub retried: bool,
}

/// Decorates outgoing payloads with a deterministically chosen
/// structure variant.
pub struct Decorator<S: StateStore> {
    catalog: VariantCatalog,
    store: S,
}

impl<S: StateStore> Decorator<S> {
    pub fn new(catalog: VariantCatalog, store: S) -> Decorator<S> {
        Decorator { catalog, store }
    }

    /// Build a decorator from a catalog JSON file.
    pub fn from_json_file(path: &Path, store: S) -> Result<Decorator<S>, CatalogError> {
        Ok(Decorator::new(VariantCatalog::load_from_json(path)?, store))
    }

    pub fn catalog(&self) -> &VariantCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Run the selection pipeline for one attempt without touching a
    /// payload. `day` is the account's local date, `YYYY-MM-DD`.
    ///
    /// `None` means "skip decoration": the catalog is unusable or no
    /// weight table could be built for the preset's level. Consumes one
    /// sequence number otherwise.
    pub fn select(&mut self, preset: &Preset, day: &str) -> Option<Selection> {
        if !self.catalog.is_usable() {
            return None;
        }

        let level = preset.level.as_str();
        let table = weights::resolve(
            preset.weights_for(level),
            self.catalog.default_weights_for(level),
        )?;

        let seq_key = store::sequence_key(&preset.account_id, &preset.id, level, day);
        let sequence = store::next_sequence(&mut self.store, &seq_key);

        let ctx = SelectionContext {
            account_id: preset.account_id.clone(),
            preset_id: preset.id.clone(),
            level: level.to_string(),
            day: day.to_string(),
            sequence,
        };
        let seed = ctx.seed();

        let picked = picker::pick(&table, unit_interval(&seed))?;
        // Weight tables may name keys the catalog no longer declares.
        let naive = if self.catalog.contains_key(picked) {
            picked.to_string()
        } else {
            self.catalog.first_key()?.to_string()
        };

        let hist_key = store::history_key(&preset.account_id, &preset.id);
        let history = guard::load_history(&self.store, &hist_key);
        let result = guard::apply(&naive, &ctx, &table, &self.catalog, &history);
        guard::record_pick(&mut self.store, &hist_key, history, &result.key);

        Some(Selection {
            key: result.key,
            sequence,
            retried: result.retried,
        })
    }

    /// Decorate a payload for one generate/preview call.
    ///
    /// The returned payload is identical to the input except that the
    /// catalog's injection-target field holds the composed text. When
    /// decoration is skipped the input comes back unchanged.
    pub fn decorate(&mut self, preset: &Preset, day: &str, mut payload: Value) -> Value {
        let Some(selection) = self.select(preset, day) else {
            return payload;
        };
        let Some(block) = self.catalog.block(&selection.key) else {
            return payload;
        };

        let composed = compose::compose(
            block,
            compose::existing_text(&payload, &self.catalog.inject_target),
        );
        compose::inject(&mut payload, &self.catalog.inject_target, composed);
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::{MemoryStore, StoreError};
    use crate::schema::catalog::Variant;
    use serde_json::json;
    use std::collections::HashMap;

    fn catalog(keys: &[&str], level_weights: &[(&str, &[(&str, f64)])]) -> VariantCatalog {
        VariantCatalog {
            enabled: true,
            inject_target: "instructions".to_string(),
            variants: keys
                .iter()
                .map(|k| {
                    (
                        k.to_string(),
                        Variant {
                            block: format!("Structure {}.", k),
                        },
                    )
                })
                .collect(),
            default_weights: level_weights
                .iter()
                .map(|(level, entries)| {
                    (
                        level.to_string(),
                        entries
                            .iter()
                            .map(|(k, w)| (k.to_string(), *w))
                            .collect::<HashMap<String, f64>>(),
                    )
                })
                .collect(),
        }
    }

    fn two_variant_decorator() -> Decorator<MemoryStore> {
        Decorator::new(
            catalog(&["A", "B"], &[("L0", &[("A", 0.5), ("B", 0.5)])]),
            MemoryStore::new(),
        )
    }

    #[test]
    fn same_inputs_same_pick() {
        let preset = Preset::new("p1", "a1", "L0");
        let first = two_variant_decorator()
            .select(&preset, "2024-06-01")
            .unwrap();
        let second = two_variant_decorator()
            .select(&preset, "2024-06-01")
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.sequence, 1);
    }

    #[test]
    fn sequence_advances_within_a_day() {
        let mut decorator = two_variant_decorator();
        let preset = Preset::new("p1", "a1", "L0");
        let first = decorator.select(&preset, "2024-06-01").unwrap();
        let second = decorator.select(&preset, "2024-06-01").unwrap();
        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);
        // A new day starts its own counter.
        let next_day = decorator.select(&preset, "2024-06-02").unwrap();
        assert_eq!(next_day.sequence, 1);
    }

    #[test]
    fn disabled_catalog_skips_decoration() {
        let mut cat = catalog(&["A"], &[("L0", &[("A", 1.0)])]);
        cat.enabled = false;
        let mut decorator = Decorator::new(cat, MemoryStore::new());
        let preset = Preset::new("p1", "a1", "L0");

        assert!(decorator.select(&preset, "2024-06-01").is_none());

        let payload = json!({ "instructions": "keep", "topic": "tea" });
        let out = decorator.decorate(&preset, "2024-06-01", payload.clone());
        assert_eq!(out, payload);
        // Skipping consumes nothing from the store.
        assert!(decorator.store().is_empty());
    }

    #[test]
    fn missing_level_weights_skip_decoration() {
        let mut decorator = two_variant_decorator();
        let preset = Preset::new("p1", "a1", "L9");
        assert!(decorator.select(&preset, "2024-06-01").is_none());
    }

    #[test]
    fn preset_override_pins_the_pick() {
        let cat = catalog(&["A", "B"], &[("L0", &[("A", 0.5), ("B", 0.5)])]);
        let mut preset = Preset::new("p1", "a1", "L0");
        preset.meta.structure_weights = Some(HashMap::from([(
            "L0".to_string(),
            HashMap::from([("B".to_string(), 1.0)]),
        )]));

        let mut decorator = Decorator::new(cat, MemoryStore::new());
        for _ in 0..5 {
            let selection = decorator.select(&preset, "2024-06-01").unwrap();
            assert_eq!(selection.key, "B");
        }
    }

    #[test]
    fn unknown_weight_key_falls_back_to_first_catalog_key() {
        let cat = catalog(&["alpha", "beta"], &[("L0", &[("zeta", 1.0)])]);
        let mut decorator = Decorator::new(cat, MemoryStore::new());
        let preset = Preset::new("p1", "a1", "L0");
        let selection = decorator.select(&preset, "2024-06-01").unwrap();
        assert_eq!(selection.key, "alpha");
    }

    #[test]
    fn third_repeat_forces_resample_best_effort() {
        // Single-variant table: the retry can only land on A again, so
        // the third repeat is accepted after exactly one retry.
        let cat = catalog(&["A", "B"], &[("L0", &[("A", 1.0)])]);
        let mut decorator = Decorator::new(cat, MemoryStore::new());
        let preset = Preset::new("p1", "a1", "L0");

        let first = decorator.select(&preset, "2024-06-01").unwrap();
        let second = decorator.select(&preset, "2024-06-01").unwrap();
        let third = decorator.select(&preset, "2024-06-01").unwrap();

        assert_eq!(first.key, "A");
        assert_eq!(second.key, "A");
        assert!(!second.retried);
        assert_eq!(third.key, "A");
        assert!(third.retried);
    }

    #[test]
    fn decorate_injects_block_before_existing_text() {
        let cat = catalog(&["A"], &[("L0", &[("A", 1.0)])]);
        let mut decorator = Decorator::new(cat, MemoryStore::new());
        let preset = Preset::new("p1", "a1", "L0");

        let out = decorator.decorate(
            &preset,
            "2024-06-01",
            json!({ "instructions": "user notes", "topic": "tea" }),
        );
        assert_eq!(out["instructions"], "Structure A.\n\nuser notes\n");
        assert_eq!(out["topic"], "tea");
    }

    #[test]
    fn decorate_without_existing_text_appends_newline() {
        let cat = catalog(&["A"], &[("L0", &[("A", 1.0)])]);
        let mut decorator = Decorator::new(cat, MemoryStore::new());
        let preset = Preset::new("p1", "a1", "L0");

        let out = decorator.decorate(&preset, "2024-06-01", json!({}));
        assert_eq!(out["instructions"], "Structure A.\n");
    }

    #[test]
    fn into_store_hands_back_accumulated_state() {
        let mut decorator = two_variant_decorator();
        let preset = Preset::new("p1", "a1", "L0");
        decorator.select(&preset, "2024-06-01").unwrap();

        // One sequence counter plus one history entry.
        let store = decorator.into_store();
        assert_eq!(store.len(), 2);
        assert!(store
            .get(&store::history_key("a1", "p1"))
            .unwrap()
            .is_some());
    }

    struct FailingStore;

    impl StateStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(std::io::Error::other("unavailable").into())
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(std::io::Error::other("unavailable").into())
        }
        fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
            Err(std::io::Error::other("unavailable").into())
        }
    }

    #[test]
    fn store_fault_degrades_but_stays_deterministic() {
        let cat = catalog(&["A", "B"], &[("L0", &[("A", 0.5), ("B", 0.5)])]);
        let mut decorator = Decorator::new(cat, FailingStore);
        let preset = Preset::new("p1", "a1", "L0");

        let first = decorator.select(&preset, "2024-06-01").unwrap();
        let second = decorator.select(&preset, "2024-06-01").unwrap();
        // Counter stuck at 1, history unreadable: every call collapses
        // to the same deterministic draw.
        assert_eq!(first.sequence, 1);
        assert_eq!(first, second);
    }
}
