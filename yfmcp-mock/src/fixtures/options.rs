use serde_json::{Value, json};

/// 2024-01-19 and 2024-01-26, 00:00 UTC.
pub const EXPIRATIONS: [i64; 2] = [1_705_622_400, 1_706_227_200];

pub fn by_symbol(symbol: &str, date: Option<i64>) -> Option<Value> {
    if symbol != "AAPL" {
        return None;
    }
    let chain = match date {
        Some(epoch) if EXPIRATIONS.contains(&epoch) => vec![chain(epoch)],
        _ => Vec::new(),
    };
    Some(json!({
        "underlyingSymbol": "AAPL",
        "expirationDates": EXPIRATIONS,
        "strikes": [180.0, 190.0],
        "quote": {"symbol": "AAPL", "regularMarketPrice": 185.64},
        "options": chain
    }))
}

fn chain(expiration: i64) -> Value {
    let contract = |kind: char, strike: f64, last: f64| {
        json!({
            "contractSymbol": format!("AAPL{expiration}{kind}{strike:08.0}"),
            "strike": strike,
            "currency": "USD",
            "lastPrice": last,
            "bid": last - 0.05,
            "ask": last + 0.05,
            "volume": 1200,
            "openInterest": 15_000,
            "impliedVolatility": 0.21,
            "inTheMoney": (kind == 'C') == (strike < 185.64),
            "expiration": expiration,
            "lastTradeDate": expiration - 86_400,
            "contractSize": "REGULAR"
        })
    };
    json!({
        "expirationDate": expiration,
        "hasMiniOptions": false,
        "calls": [contract('C', 180.0, 6.10), contract('C', 190.0, 0.85)],
        "puts": [contract('P', 180.0, 0.40), contract('P', 190.0, 4.75)]
    })
}
