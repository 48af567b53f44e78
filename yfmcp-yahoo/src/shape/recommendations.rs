use std::collections::HashSet;

use chrono::{DateTime, Months, Utc};
use serde_json::{Value, json};
use yfmcp_core::json::{drop_keys, unwrap_raw};

use super::{array_at, iso_from_epoch};

/// Default look-back for upgrades and downgrades.
pub const DEFAULT_MONTHS_BACK: u32 = 12;

/// Analyst trend rows from `recommendationTrend.trend`.
#[must_use]
pub fn trend(result: &Value) -> Vec<Value> {
    result
        .get("recommendationTrend")
        .map(|module| array_at(module, "trend"))
        .unwrap_or_default()
        .iter()
        .map(|row| match unwrap_raw(row.clone()) {
            Value::Object(mut fields) => {
                drop_keys(&mut fields, &["maxAge"]);
                Value::Object(fields)
            }
            other => other,
        })
        .collect()
}

/// Epoch seconds `months_back` calendar months before `now`.
#[must_use]
pub fn cutoff(now: DateTime<Utc>, months_back: u32) -> i64 {
    now.checked_sub_months(Months::new(months_back))
        .map_or(i64::MIN, |dt| dt.timestamp())
}

/// Rating changes at or after `cutoff`, newest first, one row per firm.
///
/// For each firm only its most recent change survives.
#[must_use]
pub fn upgrades_downgrades(result: &Value, cutoff: i64) -> Vec<Value> {
    let mut rows: Vec<(i64, &Value)> = result
        .get("upgradeDowngradeHistory")
        .map(|module| array_at(module, "history"))
        .unwrap_or_default()
        .iter()
        .filter_map(|row| Some((row.get("epochGradeDate")?.as_i64()?, row)))
        .filter(|(epoch, _)| *epoch >= cutoff)
        .collect();
    rows.sort_by(|a, b| b.0.cmp(&a.0));

    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|(_, row)| seen.insert(text(row, "firm").to_string()))
        .map(|(epoch, row)| {
            json!({
                "GradeDate": iso_from_epoch(epoch),
                "Firm": text(row, "firm"),
                "ToGrade": text(row, "toGrade"),
                "FromGrade": text(row, "fromGrade"),
                "Action": text(row, "action"),
            })
        })
        .collect()
}

fn text<'a>(row: &'a Value, key: &str) -> &'a str {
    row.get(key).and_then(Value::as_str).unwrap_or_default()
}
