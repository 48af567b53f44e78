use std::collections::BTreeMap;

use serde_json::{Value, json};

use super::iso_from_epoch;

#[derive(Default)]
struct Row {
    dividends: f64,
    splits: f64,
}

/// Merge `events.dividends` and `events.splits` into date-ascending rows.
///
/// Events sharing a date share a row; the missing side is `0`. A split's value
/// is `numerator / denominator`.
#[must_use]
pub fn rows(result: &Value) -> Vec<Value> {
    let events = result.get("events");
    let mut by_date: BTreeMap<i64, Row> = BTreeMap::new();

    for dividend in event_values(events, "dividends") {
        let (Some(date), Some(amount)) = (
            dividend.get("date").and_then(Value::as_i64),
            dividend.get("amount").and_then(Value::as_f64),
        ) else {
            continue;
        };
        by_date.entry(date).or_default().dividends = amount;
    }

    for split in event_values(events, "splits") {
        let (Some(date), Some(numerator), Some(denominator)) = (
            split.get("date").and_then(Value::as_i64),
            split.get("numerator").and_then(Value::as_f64),
            split.get("denominator").and_then(Value::as_f64),
        ) else {
            continue;
        };
        if denominator == 0.0 {
            continue;
        }
        by_date.entry(date).or_default().splits = numerator / denominator;
    }

    by_date
        .into_iter()
        .filter_map(|(date, row)| {
            Some(json!({
                "Date": iso_from_epoch(date)?,
                "Dividends": row.dividends,
                "Stock Splits": row.splits,
            }))
        })
        .collect()
}

/// Event maps are keyed by epoch string; only the values matter.
fn event_values<'a>(events: Option<&'a Value>, kind: &str) -> impl Iterator<Item = &'a Value> {
    events
        .and_then(|e| e.get(kind))
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(serde_json::Map::values)
}
