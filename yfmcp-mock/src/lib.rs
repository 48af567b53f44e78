//! yfmcp-mock
//!
//! Deterministic stand-in for the Yahoo Finance endpoints. [`MockAdapter`]
//! answers with upstream-shaped JSON from static fixtures, so the whole shaping
//! and tool stack can run without a network.
//!
//! Fixture symbols: `AAPL` (every endpoint) and `MSFT` (chart, price, empty
//! news). Special symbols drive failure paths:
//!
//! - `FAIL`: every call fails with HTTP 500;
//! - `REJECT`: every call answers 200 with an embedded error object;
//! - `TIMEOUT`: a short delay, then an empty result;
//! - anything else: an empty result, i.e. an unknown ticker.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};
use yfmcp_core::Clock;
use yfmcp_types::YfmcpError;
use yfmcp_yahoo::YahooFinance;
use yfmcp_yahoo::adapter::{
    ChartQuery, CloneArcAdapters, YfChart, YfOptions, YfQuoteSummary, YfSearch,
};

mod fixtures;

/// Mock adapter for CI-safe runs. Provides deterministic data from static fixtures.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockAdapter;

/// Clock pinned to [`MockAdapter::fixture_now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureClock;

impl Clock for FixtureClock {
    fn now(&self) -> DateTime<Utc> {
        MockAdapter::fixture_now()
    }
}

impl MockAdapter {
    /// Create the adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Instant the fixtures are written against (2024-06-01T00:00:00Z).
    #[must_use]
    pub fn fixture_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_717_200_000, 0).unwrap_or_default()
    }

    /// Connector wired to this adapter and to [`FixtureClock`].
    #[must_use]
    pub fn connector() -> YahooFinance {
        YahooFinance::from_adapter_with_clock(&Self, Arc::new(FixtureClock))
    }

    async fn maybe_fail_or_timeout(symbol: &str, envelope: &str) -> Result<Option<Value>, YfmcpError> {
        match symbol {
            "FAIL" => Err(YfmcpError::upstream_http(
                500,
                format!("forced failure: {envelope}"),
            )),
            "REJECT" => Ok(Some(json!({ envelope: {
                "result": null,
                "error": {"code": "Bad Request", "description": format!("forced rejection: {envelope}")}
            }}))),
            "TIMEOUT" => {
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn envelope(name: &str, result: Option<Value>) -> Value {
        let results: Vec<Value> = result.into_iter().collect();
        json!({ name: {"result": results, "error": null} })
    }
}

#[async_trait]
impl YfChart for MockAdapter {
    async fn chart(&self, symbol: &str, query: &ChartQuery) -> Result<Value, YfmcpError> {
        if let Some(forced) = Self::maybe_fail_or_timeout(symbol, "chart").await? {
            return Ok(forced);
        }
        let result = fixtures::chart::by_symbol(symbol, query.events.is_some());
        Ok(Self::envelope("chart", result))
    }
}

#[async_trait]
impl YfQuoteSummary for MockAdapter {
    async fn modules(&self, symbol: &str, modules: &[&str]) -> Result<Value, YfmcpError> {
        if let Some(forced) = Self::maybe_fail_or_timeout(symbol, "quoteSummary").await? {
            return Ok(forced);
        }
        let result = fixtures::summary::modules(symbol).map(|all| {
            let picked: Map<String, Value> = modules
                .iter()
                .filter_map(|m| all.get(*m).map(|v| ((*m).to_string(), v.clone())))
                .collect();
            Value::Object(picked)
        });
        Ok(Self::envelope("quoteSummary", result))
    }
}

#[async_trait]
impl YfSearch for MockAdapter {
    async fn news(&self, query: &str, news_count: u32) -> Result<Value, YfmcpError> {
        if let Some(forced) = Self::maybe_fail_or_timeout(query, "finance").await? {
            return Ok(forced);
        }
        let limit = usize::try_from(news_count).unwrap_or(usize::MAX);
        let news: Vec<Value> = fixtures::search::news(query)
            .unwrap_or_default()
            .into_iter()
            .take(limit)
            .collect();
        Ok(json!({"count": news.len(), "quotes": [], "news": news}))
    }
}

#[async_trait]
impl YfOptions for MockAdapter {
    async fn options(&self, symbol: &str, date: Option<i64>) -> Result<Value, YfmcpError> {
        if let Some(forced) = Self::maybe_fail_or_timeout(symbol, "optionChain").await? {
            return Ok(forced);
        }
        Ok(Self::envelope(
            "optionChain",
            fixtures::options::by_symbol(symbol, date),
        ))
    }
}

impl CloneArcAdapters for MockAdapter {
    fn clone_arc_chart(&self) -> Arc<dyn YfChart> {
        Arc::new(*self)
    }
    fn clone_arc_quote_summary(&self) -> Arc<dyn YfQuoteSummary> {
        Arc::new(*self)
    }
    fn clone_arc_search(&self) -> Arc<dyn YfSearch> {
        Arc::new(*self)
    }
    fn clone_arc_options(&self) -> Arc<dyn YfOptions> {
        Arc::new(*self)
    }
}
