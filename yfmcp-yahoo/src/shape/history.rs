use serde_json::{Value, json};
use yfmcp_types::YfmcpError;

use super::{array_at, iso_from_epoch};

/// Zip a chart result's timestamps with its quote and adjusted-close series.
///
/// Rows whose close is null (halted or not-yet-printed bars) are skipped.
/// `Adj Close` falls back to `Close` when the adjusted series is absent.
///
/// # Errors
/// Returns `Data` when the quote series is missing.
pub fn rows(result: &Value) -> Result<Vec<Value>, YfmcpError> {
    let timestamps = array_at(result, "timestamp");
    let indicators = result
        .get("indicators")
        .ok_or_else(|| YfmcpError::Data("chart result has no indicators".into()))?;
    let quote = array_at(indicators, "quote")
        .first()
        .ok_or_else(|| YfmcpError::Data("chart result has no quote series".into()))?;
    let adjclose = array_at(indicators, "adjclose")
        .first()
        .map(|a| array_at(a, "adjclose"))
        .unwrap_or_default();

    let series = |name: &str, i: usize| {
        quote
            .get(name)
            .and_then(|s| s.get(i))
            .cloned()
            .unwrap_or(Value::Null)
    };

    let mut out = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let close = series("close", i);
        if close.is_null() {
            continue;
        }
        let Some(date) = ts.as_i64().and_then(iso_from_epoch) else {
            continue;
        };
        let adj = adjclose
            .get(i)
            .filter(|v| !v.is_null())
            .cloned()
            .unwrap_or_else(|| close.clone());
        out.push(json!({
            "Date": date,
            "Open": series("open", i),
            "High": series("high", i),
            "Low": series("low", i),
            "Close": close,
            "Volume": series("volume", i),
            "Adj Close": adj,
        }));
    }
    Ok(out)
}
