use serde_json::{Map, Value, json};

/// Quote-summary modules available for `symbol`.
pub fn modules(symbol: &str) -> Option<Map<String, Value>> {
    let all = match symbol {
        "AAPL" => aapl(),
        "MSFT" => msft(),
        _ => return None,
    };
    match all {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn n(raw: f64, fmt: &str) -> Value {
    json!({"raw": raw, "fmt": fmt})
}

fn i(raw: i64, fmt: &str) -> Value {
    json!({"raw": raw, "fmt": fmt, "longFmt": raw.to_string()})
}

fn date(raw: i64, fmt: &str) -> Value {
    json!({"raw": raw, "fmt": fmt})
}

fn statement(end: i64, end_fmt: &str, revenue: i64, net_income: i64) -> Value {
    json!({
        "maxAge": 1,
        "endDate": date(end, end_fmt),
        "totalRevenue": i(revenue, ""),
        "netIncome": i(net_income, ""),
        "totalAssets": i(revenue * 3, ""),
        "totalCashFromOperatingActivities": i(net_income + net_income / 5, "")
    })
}

fn aapl() -> Value {
    let annual = vec![
        statement(1_696_032_000, "2023-09-30", 383_285_000_000, 96_995_000_000),
        statement(1_664_496_000, "2022-09-30", 394_328_000_000, 99_803_000_000),
    ];
    let quarterly = vec![
        statement(1_703_894_400, "2023-12-30", 119_575_000_000, 33_916_000_000),
        statement(1_696_032_000, "2023-09-30", 89_498_000_000, 22_956_000_000),
    ];

    json!({
        "assetProfile": {
            "maxAge": 86_400,
            "sector": "Technology",
            "industry": "Consumer Electronics",
            "country": "United States",
            "fullTimeEmployees": 161_000,
            "website": "https://www.apple.com"
        },
        "summaryDetail": {
            "maxAge": 1,
            "previousClose": n(192.53, "192.53"),
            "marketCap": i(2_871_000_000_000, "2.87T"),
            "dividendYield": n(0.0051, "0.51%"),
            "trailingPE": n(30.1, "30.10")
        },
        "financialData": {
            "maxAge": 86_400,
            "currentPrice": n(185.64, "185.64"),
            "recommendationKey": "buy",
            "totalRevenue": i(383_285_000_000, "383.29B")
        },
        "defaultKeyStatistics": {
            "maxAge": 1,
            "sharesOutstanding": i(15_461_900_000, "15.46B"),
            "beta": n(1.29, "1.29")
        },
        "price": {
            "maxAge": 1,
            "symbol": "AAPL",
            "shortName": "Apple Inc.",
            "currency": "USD",
            "regularMarketPrice": n(185.64, "185.64")
        },
        "quoteType": {
            "symbol": "AAPL",
            "quoteType": "EQUITY",
            "exchange": "NMS"
        },
        "incomeStatementHistory": {"maxAge": 86_400, "incomeStatementHistory": annual},
        "incomeStatementHistoryQuarterly": {"maxAge": 86_400, "incomeStatementHistory": quarterly},
        "balanceSheetHistory": {"maxAge": 86_400, "balanceSheetStatements": annual},
        "balanceSheetHistoryQuarterly": {"maxAge": 86_400, "balanceSheetStatements": quarterly},
        "cashflowStatementHistory": {"maxAge": 86_400, "cashflowStatements": annual},
        "cashflowStatementHistoryQuarterly": {"maxAge": 86_400, "cashflowStatements": quarterly},
        "majorHoldersBreakdown": {
            "maxAge": 1,
            "insidersPercentHeld": n(0.0007, "0.07%"),
            "institutionsPercentHeld": n(0.6147, "61.47%"),
            "institutionsCount": i(6_089, "6.09k")
        },
        "institutionOwnership": {"maxAge": 1, "ownershipList": [
            {
                "maxAge": 1,
                "reportDate": date(1_696_032_000, "2023-09-30"),
                "organization": "Vanguard Group Inc",
                "pctHeld": n(0.0837, "8.37%"),
                "position": i(1_299_997_133, "1.3B")
            },
            {
                "maxAge": 1,
                "reportDate": date(1_696_032_000, "2023-09-30"),
                "organization": "Blackrock Inc.",
                "pctHeld": n(0.0662, "6.62%"),
                "position": i(1_031_407_553, "1.03B")
            }
        ]},
        "fundOwnership": {"maxAge": 1, "ownershipList": [{
            "maxAge": 1,
            "reportDate": date(1_703_980_800, "2023-12-31"),
            "organization": "Vanguard Total Stock Market Index Fund",
            "pctHeld": n(0.0295, "2.95%")
        }]},
        "insiderTransactions": {"maxAge": 1, "transactions": [{
            "maxAge": 1,
            "filerName": "COOK TIMOTHY D",
            "filerRelation": "Chief Executive Officer",
            "transactionText": "Sale at price 171.21 - 176.28 per share.",
            "startDate": date(1_696_377_600, "2023-10-04"),
            "shares": i(511_000, "511k")
        }]},
        "netSharePurchaseActivity": {
            "maxAge": 1,
            "period": "6m",
            "buyInfoShares": i(1_186_400, "1.19M"),
            "sellInfoShares": i(2_103_910, "2.1M")
        },
        "insiderHolders": {"maxAge": 1, "holders": [{
            "maxAge": 1,
            "name": "COOK TIMOTHY D",
            "relation": "Chief Executive Officer",
            "latestTransDate": date(1_696_377_600, "2023-10-04"),
            "positionDirect": i(3_280_418, "3.28M")
        }]},
        "recommendationTrend": {"maxAge": 86_400, "trend": [
            {"period": "0m", "strongBuy": 11, "buy": 21, "hold": 6, "sell": 0, "strongSell": 0},
            {"period": "-1m", "strongBuy": 10, "buy": 20, "hold": 7, "sell": 1, "strongSell": 0}
        ]},
        "upgradeDowngradeHistory": {"maxAge": 86_400, "history": [
            {"epochGradeDate": 1_714_521_600, "firm": "Morgan Stanley", "toGrade": "Overweight", "fromGrade": "Overweight", "action": "main"},
            {"epochGradeDate": 1_709_251_200, "firm": "Barclays", "toGrade": "Underweight", "fromGrade": "Equal-Weight", "action": "down"},
            {"epochGradeDate": 1_704_067_200, "firm": "Morgan Stanley", "toGrade": "Overweight", "fromGrade": "Equal-Weight", "action": "up"},
            {"epochGradeDate": 1_640_995_200, "firm": "Goldman Sachs", "toGrade": "Buy", "fromGrade": "", "action": "init"}
        ]}
    })
}

fn msft() -> Value {
    json!({
        "price": {
            "maxAge": 1,
            "symbol": "MSFT",
            "shortName": "Microsoft Corporation",
            "currency": "USD",
            "regularMarketPrice": n(370.87, "370.87")
        },
        "quoteType": {"symbol": "MSFT", "quoteType": "EQUITY", "exchange": "NMS"}
    })
}
