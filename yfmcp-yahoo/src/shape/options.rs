use serde_json::Value;
use yfmcp_core::json::unwrap_raw;
use yfmcp_types::OptionType;

use super::{array_at, date_only, epochs_to_iso};

/// Expiration epochs listed in an options result.
#[must_use]
pub fn expiration_epochs(result: &Value) -> Vec<i64> {
    array_at(result, "expirationDates")
        .iter()
        .filter_map(Value::as_i64)
        .collect()
}

/// Expirations as `YYYY-MM-DD`, in upstream order.
#[must_use]
pub fn expiration_dates(result: &Value) -> Vec<String> {
    expiration_epochs(result)
        .into_iter()
        .filter_map(date_only)
        .collect()
}

/// Epoch of the listed expiration falling on `date` (`YYYY-MM-DD`), if any.
#[must_use]
pub fn find_expiration(result: &Value, date: &str) -> Option<i64> {
    expiration_epochs(result)
        .into_iter()
        .find(|epoch| date_only(*epoch).as_deref() == Some(date))
}

/// Contracts on one side of the first chain in an options result.
///
/// `raw` wrappers are unwrapped; `expiration` and `lastTradeDate` become ISO
/// strings.
#[must_use]
pub fn contracts(result: &Value, side: OptionType) -> Vec<Value> {
    array_at(result, "options")
        .first()
        .map(|chain| array_at(chain, side.as_str()))
        .unwrap_or_default()
        .iter()
        .filter_map(|contract| match unwrap_raw(contract.clone()) {
            Value::Object(mut fields) => {
                epochs_to_iso(&mut fields, &["expiration", "lastTradeDate"]);
                Some(Value::Object(fields))
            }
            _ => None,
        })
        .collect()
}

/// Guidance returned when `date` is not a listed expiration.
#[must_use]
pub fn no_chain_message(ticker: &str, date: &str) -> String {
    format!(
        "No options chain found for {ticker} expiring on {date}. \
         Call get_option_expiration_dates to list the available expiration dates."
    )
}
