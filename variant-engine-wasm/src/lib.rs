//! WASM bindings for variant-engine — powers the browser client.
//!
//! State lives in an in-memory store inside the handle; the hosting page
//! owns persistence (it can snapshot/restore through local storage if it
//! wants picks to survive reloads).

use wasm_bindgen::prelude::*;

use variant_engine::core::pipeline::Decorator;
use variant_engine::core::store::MemoryStore;
use variant_engine::schema::catalog::VariantCatalog;
use variant_engine::schema::preset::Preset;

// ---------------------------------------------------------------------------
// Embedded demo catalog — compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const DEMO_CATALOG: &str = include_str!("../../catalog_data/demo.json");
}

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct SelectionInfo {
    key: String,
    sequence: u64,
    retried: bool,
}

#[derive(serde::Serialize)]
struct CatalogInfo {
    usable: bool,
    inject_target: String,
    variant_keys: Vec<String>,
    levels: Vec<String>,
}

fn err_to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// A decorator handle usable from JS. Construct from a catalog JSON
/// string, then call `decorate` per preview/generate request.
#[wasm_bindgen]
pub struct WasmDecorator {
    inner: Decorator<MemoryStore>,
}

#[wasm_bindgen]
impl WasmDecorator {
    #[wasm_bindgen(constructor)]
    pub fn new(catalog_json: &str) -> Result<WasmDecorator, JsValue> {
        let catalog = VariantCatalog::parse_json(catalog_json).map_err(err_to_js)?;
        Ok(WasmDecorator {
            inner: Decorator::new(catalog, MemoryStore::new()),
        })
    }

    /// A decorator over the embedded demo catalog.
    pub fn demo() -> WasmDecorator {
        let catalog = VariantCatalog::parse_json(data::DEMO_CATALOG).unwrap_or_default();
        WasmDecorator {
            inner: Decorator::new(catalog, MemoryStore::new()),
        }
    }

    /// Catalog summary as a JSON string.
    pub fn catalog_info(&self) -> Result<String, JsValue> {
        let catalog = self.inner.catalog();
        let mut variant_keys: Vec<String> = catalog.variants.keys().cloned().collect();
        variant_keys.sort_unstable();
        let mut levels: Vec<String> = catalog.default_weights.keys().cloned().collect();
        levels.sort_unstable();
        serde_json::to_string(&CatalogInfo {
            usable: catalog.is_usable(),
            inject_target: catalog.inject_target.clone(),
            variant_keys,
            levels,
        })
        .map_err(err_to_js)
    }

    /// Run one selection for a preset JSON object and a `YYYY-MM-DD`
    /// day. Returns a `SelectionInfo` JSON string, or `null` when
    /// decoration would be skipped.
    pub fn select(&mut self, preset_json: &str, day: &str) -> Result<String, JsValue> {
        let preset: Preset = serde_json::from_str(preset_json).map_err(err_to_js)?;
        match self.inner.select(&preset, day) {
            Some(selection) => serde_json::to_string(&SelectionInfo {
                key: selection.key,
                sequence: selection.sequence,
                retried: selection.retried,
            })
            .map_err(err_to_js),
            None => Ok("null".to_string()),
        }
    }

    /// Decorate a payload JSON object, returning the decorated payload
    /// as a JSON string. Unusable configuration returns the payload
    /// unchanged, never an error.
    pub fn decorate(
        &mut self,
        preset_json: &str,
        day: &str,
        payload_json: &str,
    ) -> Result<String, JsValue> {
        let preset: Preset = serde_json::from_str(preset_json).map_err(err_to_js)?;
        let payload: serde_json::Value =
            serde_json::from_str(payload_json).map_err(err_to_js)?;
        let decorated = self.inner.decorate(&preset, day, payload);
        serde_json::to_string(&decorated).map_err(err_to_js)
    }
}
