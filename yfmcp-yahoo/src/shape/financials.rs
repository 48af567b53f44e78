use serde_json::Value;
use yfmcp_core::json::{drop_keys, unwrap_raw};
use yfmcp_types::FinancialType;

use super::array_at;

/// Flattened statements for `kind`, most recent first as delivered upstream.
#[must_use]
pub fn statements(result: &Value, kind: FinancialType) -> Vec<Value> {
    result
        .get(kind.module())
        .map(|module| array_at(module, kind.statements_key()))
        .unwrap_or_default()
        .iter()
        .cloned()
        .map(flatten_statement)
        .collect()
}

/// Flatten one statement.
///
/// `endDate` becomes `date` (its formatted string when present), `maxAge` is
/// dropped and every `raw` wrapper is unwrapped. Applying it twice yields the
/// same value.
#[must_use]
pub fn flatten_statement(statement: Value) -> Value {
    let Value::Object(mut map) = statement else {
        return unwrap_raw(statement);
    };
    if let Some(end) = map.remove("endDate") {
        let date = match end.get("fmt") {
            Some(fmt) => fmt.clone(),
            None => unwrap_raw(end),
        };
        map.insert("date".into(), date);
    }
    drop_keys(&mut map, &["maxAge"]);
    unwrap_raw(Value::Object(map))
}
