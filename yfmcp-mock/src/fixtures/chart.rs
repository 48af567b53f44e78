use serde_json::{Value, json};

/// Two daily bars, 2024-01-02 and 2024-01-03 at the US open.
const BARS: [i64; 2] = [1_704_205_800, 1_704_292_200];

pub fn by_symbol(symbol: &str, with_events: bool) -> Option<Value> {
    let (quote, adjclose, events) = match symbol {
        "AAPL" => (
            json!({
                "open": [187.15, 184.22],
                "high": [188.44, 185.88],
                "low": [183.89, 183.43],
                "close": [185.64, 184.25],
                "volume": [82_488_700, 58_414_500]
            }),
            json!([185.15, 183.76]),
            json!({
                "dividends": {
                    "1707402600": {"amount": 0.24, "date": 1_707_402_600},
                    "1715347800": {"amount": 0.25, "date": 1_715_347_800}
                },
                "splits": {
                    "1598880600": {"date": 1_598_880_600, "numerator": 4, "denominator": 1, "splitRatio": "4:1"}
                }
            }),
        ),
        "MSFT" => (
            json!({
                "open": [373.86, 369.01],
                "high": [375.90, 373.26],
                "low": [366.77, 368.51],
                "close": [370.87, null],
                "volume": [25_258_600, 23_083_500]
            }),
            json!([369.94, null]),
            json!({}),
        ),
        _ => return None,
    };

    let mut result = json!({
        "meta": {"symbol": symbol, "currency": "USD"},
        "timestamp": BARS,
        "indicators": {"quote": [quote], "adjclose": [{"adjclose": adjclose}]}
    });
    if with_events {
        result["events"] = events;
    }
    Some(result)
}
