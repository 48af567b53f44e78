use serde_json::{Map, Value};
use yfmcp_core::json::{drop_keys, unwrap_raw};
use yfmcp_types::HolderType;

use super::{array_at, epochs_to_iso};

const DATE_KEYS: &[&str] = &[
    "reportDate",
    "startDate",
    "endDate",
    "latestTransDate",
    "positionDirectDate",
    "positionIndirectDate",
];

/// Holder view for `kind`.
///
/// `major_holders` and `insider_purchases` are single objects; every other
/// view is an array of rows. A module the upstream omitted yields an empty
/// object or array. Epoch dates become ISO strings.
#[must_use]
pub fn view(result: &Value, kind: HolderType) -> Value {
    let module = result.get(kind.module());
    match kind.rows_key() {
        None => {
            let fields = module
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            Value::Object(tidy(fields))
        }
        Some(key) => Value::Array(
            module
                .map(|m| array_at(m, key))
                .unwrap_or_default()
                .iter()
                .filter_map(|row| row.as_object().cloned())
                .map(|row| Value::Object(tidy(row)))
                .collect(),
        ),
    }
}

fn tidy(mut fields: Map<String, Value>) -> Map<String, Value> {
    drop_keys(&mut fields, &["maxAge"]);
    let Value::Object(mut flat) = unwrap_raw(Value::Object(fields)) else {
        return Map::new();
    };
    epochs_to_iso(&mut flat, DATE_KEYS);
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn major_holders_is_an_object() {
        let result = json!({"majorHoldersBreakdown": {
            "maxAge": 1,
            "insidersPercentHeld": {"raw": 0.0007, "fmt": "0.07%"},
            "institutionsCount": {"raw": 6000, "fmt": "6k"}
        }});
        assert_eq!(
            view(&result, HolderType::MajorHolders),
            json!({"insidersPercentHeld": 0.0007, "institutionsCount": 6000})
        );
    }

    #[test]
    fn institutional_rows_are_flattened_with_iso_dates() {
        let result = json!({"institutionOwnership": {"ownershipList": [{
            "maxAge": 1,
            "reportDate": {"raw": 1_704_205_800, "fmt": "2024-01-02"},
            "organization": "Vanguard Group Inc",
            "pctHeld": {"raw": 0.0837}
        }]}});
        assert_eq!(
            view(&result, HolderType::InstitutionalHolders),
            json!([{
                "reportDate": "2024-01-02T14:30:00.000Z",
                "organization": "Vanguard Group Inc",
                "pctHeld": 0.0837
            }])
        );
    }

    #[test]
    fn missing_module_is_empty() {
        assert_eq!(view(&json!({}), HolderType::InsiderTransactions), json!([]));
        assert_eq!(view(&json!({}), HolderType::InsiderPurchases), json!({}));
    }
}
