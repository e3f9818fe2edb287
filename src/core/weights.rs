/// Weight table resolution — per-level override vs. catalog defaults,
/// filtered and normalized into one probability distribution.

use std::cmp::Ordering;
use std::collections::HashMap;

/// A normalized variant-key → probability mapping. After `resolve`, the
/// values are finite, positive, and sum to exactly 1.
pub type WeightTable = HashMap<String, f64>;

/// Build the weight table for one decoration attempt.
///
/// The preset's own table for the level, when it has any valid entry,
/// is used in isolation — it is never merged with the defaults. Only an
/// empty or absent preset table falls back to the catalog default.
/// Returns `None` when neither source yields a usable table, which the
/// pipeline treats as "skip decoration", not as an error.
pub fn resolve(
    preset_table: Option<&HashMap<String, f64>>,
    default_table: Option<&HashMap<String, f64>>,
) -> Option<WeightTable> {
    let filtered = preset_table
        .map(filter_weights)
        .filter(|t| !t.is_empty())
        .or_else(|| default_table.map(filter_weights).filter(|t| !t.is_empty()))?;
    Some(normalize(filtered))
}

/// Drop entries whose weight is not a finite positive number.
fn filter_weights(raw: &HashMap<String, f64>) -> WeightTable {
    raw.iter()
        .filter(|(_, w)| w.is_finite() && **w > 0.0)
        .map(|(k, w)| (k.clone(), *w))
        .collect()
}

/// Divide by the sum, then absorb the floating-point drift on the single
/// largest entry so the table sums to exactly 1. Ties on the largest
/// value break to the smallest key, keeping the adjustment reproducible.
fn normalize(mut table: WeightTable) -> WeightTable {
    let sum: f64 = table.values().sum();
    for w in table.values_mut() {
        *w /= sum;
    }

    let largest = table
        .iter()
        .max_by(|a, b| {
            a.1.partial_cmp(b.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.0.cmp(a.0))
        })
        .map(|(k, _)| k.clone());

    if let Some(key) = largest {
        let drift = 1.0 - table.values().sum::<f64>();
        if let Some(w) = table.get_mut(&key) {
            *w += drift;
        }
    }

    table
}
