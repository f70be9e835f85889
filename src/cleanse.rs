//! Structural rename pass over raw schema JSON.
//!
//! Contract build steps export generic message schemas with titles like
//! `ExecuteMsg_for_Empty`; the `_for_` infix leaks into object keys, `title`
//! fields, and `$ref` targets. This pass rewrites all three consistently so
//! later stages only ever see the collapsed `ExecuteMsgForEmpty` spelling.
//!
//! Invariants:
//! - idempotent: `cleanse(cleanse(v)) == cleanse(v)` for every value
//! - object key order is preserved
//! - non-container leaves pass through unchanged; string values are only
//!   rewritten under `title` and `$ref` keys

use serde_json::{Map, Value};

/// Collapse every `_for_` occurrence. Replacing all occurrences (instead of
/// the first) is what keeps the pass idempotent.
fn clean_for(input: &str) -> String {
    input.replace("_for_", "For")
}

pub fn cleanse(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(cleanse).collect()),
        Value::Object(fields) => {
            let mut out = Map::with_capacity(fields.len());
            for (key, val) in fields {
                let key = if key.contains("_for_") { clean_for(key) } else { key.clone() };
                let val = match (key.as_str(), val) {
                    ("title" | "$ref", Value::String(s)) => Value::String(clean_for(s)),
                    _ => cleanse(val),
                };
                out.insert(key, val);
            }
            Value::Object(out)
        }
        leaf => leaf.clone(),
    }
}

// ------------------------------- Tests ------------------------------------ //
