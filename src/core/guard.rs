/// Anti-repetition guard — blocks a third consecutive identical pick
/// for an (account, preset) pair, best-effort.

use crate::core::hash::unit_interval;
use crate::core::picker;
use crate::core::seed::SelectionContext;
use crate::core::store::StateStore;
use crate::core::weights::WeightTable;
use crate::schema::catalog::VariantCatalog;

/// How many prior picks are remembered per pair.
pub const HISTORY_CAP: usize = 2;

/// Outcome of applying the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardResult {
    pub key: String,
    /// Whether the single re-sample ran (it may still land on the same
    /// key — the constraint is best-effort, not absolute).
    pub retried: bool,
}

/// Load the persisted history (oldest first) for a pair. A faulting or
/// corrupted store reads as empty history, degrading the guard rather
/// than failing the pipeline.
pub fn load_history(store: &dyn StateStore, key: &str) -> Vec<String> {
    store
        .get(key)
        .ok()
        .flatten()
        .and_then(|v| serde_json::from_str::<Vec<String>>(&v).ok())
        .unwrap_or_default()
}

/// Append the final pick and rotate the history down to the last
/// `HISTORY_CAP` entries. Store faults are swallowed.
pub fn record_pick(store: &mut dyn StateStore, key: &str, mut history: Vec<String>, pick: &str) {
    history.push(pick.to_string());
    if history.len() > HISTORY_CAP {
        let excess = history.len() - HISTORY_CAP;
        history.drain(..excess);
    }
    if let Ok(serialized) = serde_json::to_string(&history) {
        let _ = store.set(key, &serialized);
    }
}

/// Resolve the final pick given the naive one.
///
/// Only when both remembered picks equal the naive pick does the guard
/// re-sample, exactly once, with the original seed plus `|retry1` — the
/// sequence counter is not re-read. A retried key that is not declared
/// in the catalog loses to the naive pick: a third repeat is preferred
/// over injecting an unknown variant.
pub fn apply(
    naive: &str,
    ctx: &SelectionContext,
    table: &WeightTable,
    catalog: &VariantCatalog,
    history: &[String],
) -> GuardResult {
    if !is_third_repeat(history, naive) {
        return GuardResult {
            key: naive.to_string(),
            retried: false,
        };
    }

    let retried_key = picker::pick(table, unit_interval(&ctx.retry_seed()));
    let key = match retried_key {
        Some(key) if catalog.contains_key(key) => key.to_string(),
        _ => naive.to_string(),
    };
    GuardResult { key, retried: true }
}

fn is_third_repeat(history: &[String], pick: &str) -> bool {
    history.len() == HISTORY_CAP && history.iter().all(|h| h == pick)
}
