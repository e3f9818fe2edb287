/// Injection composition — splices the chosen variant block into the
/// payload's free-text field.

use serde_json::Value;

/// Merge the variant block with pre-existing field content. The
/// structure block always precedes user content.
pub fn compose(block: &str, existing: &str) -> String {
    match (block.is_empty(), existing.is_empty()) {
        (true, true) => String::new(),
        (false, true) => format!("{}\n", block),
        (true, false) => existing.to_string(),
        (false, false) => format!("{}\n\n{}\n", block, existing),
    }
}

/// The current text under `target` in an object payload; anything that
/// is not a string reads as empty.
pub fn existing_text<'a>(payload: &'a Value, target: &str) -> &'a str {
    payload
        .get(target)
        .and_then(Value::as_str)
        .unwrap_or_default()
}

/// Write the composed text under `target`, overwriting what was there.
/// Every other payload field passes through untouched; a non-object
/// payload is left as is.
pub fn inject(payload: &mut Value, target: &str, composed: String) {
    if let Value::Object(map) = payload {
        map.insert(target.to_string(), Value::String(composed));
    }
}
