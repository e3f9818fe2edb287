/// Weighted variant pick — deterministic cumulative walk over a
/// normalized table.

use crate::core::weights::WeightTable;

/// Return the first key (in lexicographic order) whose cumulative
/// weight strictly exceeds `u`.
///
/// Keys are sorted before accumulating so the result never depends on
/// the map's iteration order: the same `(table, u)` pair always yields
/// the same key. If rounding leaves the cumulative sum marginally below
/// `u` after the last key, that last key is returned rather than
/// failing. `None` only for an empty table.
pub fn pick(table: &WeightTable, u: f64) -> Option<&str> {
    let mut keys: Vec<&str> = table.keys().map(String::as_str).collect();
    keys.sort_unstable();

    let mut cumulative = 0.0;
    for key in &keys {
        cumulative += table.get(*key).copied().unwrap_or(0.0);
        if cumulative > u {
            return Some(key);
        }
    }
    keys.last().copied()
}
