//! Turn raw upstream payloads into the per-tool output shapes.
//!
//! Every function here is pure: it receives an already-fetched payload and
//! returns owned JSON (or text), so it can be exercised without a network.

/// Dividends and splits merged into one timeline.
pub mod actions;
/// Income statement, balance sheet and cash flow.
pub mod financials;
/// Ownership views.
pub mod holders;
/// OHLCV rows.
pub mod history;
/// Merged company profile.
pub mod info;
/// News text blocks.
pub mod news;
/// Option expirations and contracts.
pub mod options;
/// Analyst trend and rating changes.
pub mod recommendations;

use chrono::{DateTime, SecondsFormat};
use serde_json::{Map, Value};
use yfmcp_types::YfmcpError;

/// Extract `payload[envelope].result[0]`.
///
/// # Errors
/// - `UpstreamSemantic` when `payload[envelope].error` is non-null;
/// - `NotFound` when `result` is absent, null or empty;
/// - `Data` when the envelope itself is missing.
pub fn first_result(payload: &Value, envelope: &str, ticker: &str) -> Result<Value, YfmcpError> {
    let body = payload
        .get(envelope)
        .ok_or_else(|| YfmcpError::Data(format!("missing `{envelope}` envelope")))?;
    check_embedded_error(body)?;
    body.get("result")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .filter(|first| !first.is_null())
        .cloned()
        .ok_or_else(|| YfmcpError::not_found(ticker))
}

/// Fail with `UpstreamSemantic` when `body.error` is a non-null value.
///
/// # Errors
/// Returns `UpstreamSemantic` carrying the error's `description`, falling back
/// to its `code` and then to the raw JSON.
pub fn check_embedded_error(body: &Value) -> Result<(), YfmcpError> {
    match body.get("error") {
        None | Some(Value::Null) => Ok(()),
        Some(err) => {
            let description = err
                .get("description")
                .and_then(Value::as_str)
                .or_else(|| err.get("code").and_then(Value::as_str))
                .map_or_else(|| err.to_string(), str::to_string);
            Err(YfmcpError::upstream_semantic(description))
        }
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-01-02T14:30:00.000Z`.
#[must_use]
pub fn iso_from_epoch(secs: i64) -> Option<String> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// `YYYY-MM-DD` of the UTC day containing `secs`.
#[must_use]
pub fn date_only(secs: i64) -> Option<String> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.format("%Y-%m-%d").to_string())
}

/// Replace integer epoch values under `keys` with ISO strings.
pub(crate) fn epochs_to_iso(map: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        if let Some(slot) = map.get_mut(*key)
            && let Some(iso) = slot.as_i64().and_then(iso_from_epoch)
        {
            *slot = Value::String(iso);
        }
    }
}

/// Borrow `value[key]` as an array, treating absence as empty.
pub(crate) fn array_at<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}
