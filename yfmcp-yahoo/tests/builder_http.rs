use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use httpmock::prelude::*;
use serde_json::json;
use yfmcp_core::{CredentialSource, Credentials};
use yfmcp_types::{AuthPolicy, HistoryInterval, HistoryPeriod, UpstreamEndpoints, YfmcpError};
use yfmcp_yahoo::YahooFinance;

struct CountingSource(AtomicUsize);

#[async_trait]
impl CredentialSource for CountingSource {
    async fn handshake(&self) -> Result<Credentials, YfmcpError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(Credentials::new("A3=abc", "crumb1"))
    }
}

#[tokio::test]
async fn chart_is_fetched_without_credentials() {
    let server = MockServer::start_async().await;
    let chart = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v8/finance/chart/AAPL")
                .query_param("range", "1mo")
                .query_param("interval", "1d");
            then.status(200).json_body(json!({"chart": {"error": null, "result": [{
                "timestamp": [1_704_205_800],
                "indicators": {"quote": [{"open": [1.0], "high": [2.0], "low": [0.5], "close": [1.5], "volume": [10]}]}
            }]}}));
        })
        .await;

    let source = Arc::new(CountingSource(AtomicUsize::new(0)));
    let yf = YahooFinance::builder()
        .endpoints(UpstreamEndpoints::with_base(&server.base_url()))
        .credential_source(source.clone())
        .build()
        .unwrap();

    let rows = yf
        .historical_prices("AAPL", HistoryPeriod::M1, HistoryInterval::D1)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Adj Close"], json!(1.5));
    chart.assert_async().await;
    assert_eq!(source.0.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn quote_summary_shares_one_handshake() {
    let server = MockServer::start_async().await;
    let summary = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v10/finance/quoteSummary/MSFT")
                .query_param("crumb", "crumb1")
                .header("cookie", "A3=abc");
            then.status(200).json_body(json!({"quoteSummary": {"error": null, "result": [{
                "price": {"maxAge": 1, "symbol": "MSFT", "regularMarketPrice": {"raw": 410.2, "fmt": "410.20"}}
            }]}}));
        })
        .await;

    let source = Arc::new(CountingSource(AtomicUsize::new(0)));
    let yf = YahooFinance::builder()
        .endpoints(UpstreamEndpoints::with_base(&server.base_url()))
        .credential_source(source.clone())
        .build()
        .unwrap();

    for _ in 0..3 {
        let info = yf.stock_info("MSFT").await.unwrap();
        assert_eq!(info, json!({"symbol": "MSFT", "regularMarketPrice": 410.2}));
    }
    summary.assert_hits_async(3).await;
    assert_eq!(source.0.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_ticker_404_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v7/finance/options/ZZZZ");
            then.status(404).json_body(json!({"optionChain": {"result": null, "error": {
                "code": "Not Found", "description": "No data found for ZZZZ"
            }}}));
        })
        .await;

    let yf = YahooFinance::builder()
        .endpoints(UpstreamEndpoints::with_base(&server.base_url()))
        .credential_source(Arc::new(CountingSource(AtomicUsize::new(0))))
        .build()
        .unwrap();

    let err = yf.option_expiration_dates("ZZZZ").await.unwrap_err();
    assert_eq!(err.to_string(), "Ticker ZZZZ not found.");
}

#[tokio::test]
async fn best_effort_proceeds_when_handshake_fails() {
    struct Broken;
    #[async_trait]
    impl CredentialSource for Broken {
        async fn handshake(&self) -> Result<Credentials, YfmcpError> {
            Err(YfmcpError::auth_unavailable("no session cookie was issued"))
        }
    }

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v10/finance/quoteSummary/AAPL");
            then.status(200)
                .json_body(json!({"quoteSummary": {"result": [{"price": {"symbol": "AAPL"}}]}}));
        })
        .await;

    let strict = YahooFinance::builder()
        .endpoints(UpstreamEndpoints::with_base(&server.base_url()))
        .credential_source(Arc::new(Broken))
        .build()
        .unwrap();
    let err = strict.stock_info("AAPL").await.unwrap_err();
    assert!(matches!(err, YfmcpError::AuthUnavailable { .. }));

    let lenient = YahooFinance::builder()
        .endpoints(UpstreamEndpoints::with_base(&server.base_url()))
        .auth_policy(AuthPolicy::BestEffort)
        .credential_source(Arc::new(Broken))
        .build()
        .unwrap();
    assert_eq!(lenient.stock_info("AAPL").await.unwrap(), json!({"symbol": "AAPL"}));
}

#[tokio::test]
async fn news_uses_search_endpoint() {
    let server = MockServer::start_async().await;
    let search = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/finance/search")
                .query_param("q", "TSLA")
                .query_param("quotesCount", "0")
                .query_param("newsCount", "10");
            then.status(200).json_body(json!({"news": [{
                "title": "Deliveries beat", "publisher": "Reuters",
                "link": "https://example.com/a", "providerPublishTime": 1_704_205_800
            }]}));
        })
        .await;

    let yf = YahooFinance::builder()
        .endpoints(UpstreamEndpoints::with_base(&server.base_url()))
        .credential_source(Arc::new(CountingSource(AtomicUsize::new(0))))
        .build()
        .unwrap();

    let text = yf.news("TSLA").await.unwrap();
    assert_eq!(
        text,
        "Title: Deliveries beat\nPublisher: Reuters\nPublished: 2024-01-02T14:30:00.000Z\nURL: https://example.com/a"
    );
    search.assert_async().await;
}
