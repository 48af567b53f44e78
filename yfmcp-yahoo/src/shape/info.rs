use serde_json::{Map, Value};
use yfmcp_core::json::{drop_keys, unwrap_raw};

/// Quote-summary modules merged into the stock info object, in merge order.
pub const INFO_MODULES: &[&str] = &[
    "assetProfile",
    "summaryDetail",
    "financialData",
    "defaultKeyStatistics",
    "price",
    "quoteType",
];

/// Merge the info modules of a quote-summary result into one flat object.
///
/// Later modules overwrite earlier ones on key collisions. `maxAge` is dropped
/// and `raw` wrappers are unwrapped.
#[must_use]
pub fn merge(result: &Value) -> Value {
    let mut merged = Map::new();
    for module in INFO_MODULES {
        if let Some(Value::Object(fields)) = result.get(*module) {
            merged.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }
    drop_keys(&mut merged, &["maxAge"]);
    unwrap_raw(Value::Object(merged))
}
