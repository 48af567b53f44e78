//! Structural transforms over upstream JSON.

use serde_json::{Map, Value};

/// Replace every `{"raw": x, ...}` wrapper with `x`, recursively.
///
/// Quote-summary values arrive as `{"raw": 1.5, "fmt": "1.50"}`. Objects
/// without a `raw` member are kept with their members transformed; arrays are
/// transformed element-wise. The transform is idempotent.
#[must_use]
pub fn unwrap_raw(value: Value) -> Value {
    match value {
        Value::Object(mut map) => match map.remove("raw") {
            Some(raw) => unwrap_raw(raw),
            None => Value::Object(
                map.into_iter()
                    .map(|(key, inner)| (key, unwrap_raw(inner)))
                    .collect(),
            ),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(unwrap_raw).collect()),
        scalar => scalar,
    }
}

/// Remove `keys` from the top level of `map`.
pub fn drop_keys(map: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        map.remove(*key);
    }
}
