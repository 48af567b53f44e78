use serde_json::{Value, json};

pub fn news(query: &str) -> Option<Vec<Value>> {
    match query {
        "AAPL" => Some(vec![
            json!({
                "uuid": "9c1e7a52-0001",
                "title": "Apple unveils new product lineup",
                "publisher": "Reuters",
                "link": "https://finance.yahoo.com/news/apple-unveils-lineup",
                "providerPublishTime": 1_704_205_800,
                "type": "STORY"
            }),
            json!({
                "uuid": "9c1e7a52-0002",
                "title": "Apple supplier outlook improves",
                "publisher": "Bloomberg",
                "link": "https://finance.yahoo.com/news/apple-supplier-outlook",
                "providerPublishTime": 1_704_292_200,
                "type": "STORY"
            }),
        ]),
        "MSFT" => Some(Vec::new()),
        _ => None,
    }
}
