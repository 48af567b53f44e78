#[cfg(feature = "test-adapters")]
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;
use yfmcp_core::AuthenticatedFetcher;
use yfmcp_types::{UpstreamEndpoints, YfmcpError};

/// Query parameters for the chart endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartQuery {
    /// Look-back range, e.g. `1mo` or `max`.
    pub range: String,
    /// Bar size, e.g. `1d`.
    pub interval: String,
    /// Corporate events to include, e.g. `div,split`.
    pub events: Option<String>,
}

impl ChartQuery {
    /// Price bars for `range` at `interval`, no events.
    pub fn bars(range: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            range: range.into(),
            interval: interval.into(),
            events: None,
        }
    }

    /// Full-history dividends and splits.
    #[must_use]
    pub fn actions() -> Self {
        Self {
            range: "max".into(),
            interval: "1d".into(),
            events: Some("div,split".into()),
        }
    }
}

/// Chart abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait YfChart: Send + Sync {
    /// Fetch the raw chart payload for `symbol`.
    async fn chart(&self, symbol: &str, query: &ChartQuery) -> Result<Value, YfmcpError>;
}

/// Quote-summary abstraction.
#[async_trait]
pub trait YfQuoteSummary: Send + Sync {
    /// Fetch the raw quote-summary payload for the given modules.
    async fn modules(&self, symbol: &str, modules: &[&str]) -> Result<Value, YfmcpError>;
}

/// Search abstraction, used for news.
#[async_trait]
pub trait YfSearch: Send + Sync {
    /// Fetch the raw search payload with up to `news_count` articles.
    async fn news(&self, query: &str, news_count: u32) -> Result<Value, YfmcpError>;
}

/// Options abstraction.
#[async_trait]
pub trait YfOptions: Send + Sync {
    /// Fetch the raw options payload, optionally for one expiration (epoch seconds).
    async fn options(&self, symbol: &str, date: Option<i64>) -> Result<Value, YfmcpError>;
}

/// Real adapter backed by the shared authenticated fetcher.
#[derive(Debug, Clone)]
pub struct RealAdapter {
    fetcher: std::sync::Arc<AuthenticatedFetcher>,
    endpoints: std::sync::Arc<UpstreamEndpoints>,
}

impl RealAdapter {
    /// Wrap a fetcher and the endpoint set it should talk to.
    #[must_use]
    pub fn new(fetcher: std::sync::Arc<AuthenticatedFetcher>, endpoints: UpstreamEndpoints) -> Self {
        Self {
            fetcher,
            endpoints: std::sync::Arc::new(endpoints),
        }
    }

    /// Shared fetcher.
    #[must_use]
    pub const fn fetcher(&self) -> &std::sync::Arc<AuthenticatedFetcher> {
        &self.fetcher
    }
}

/// `base/<symbol>` with the symbol percent-encoded as one path segment.
pub(crate) fn symbol_url(base: &str, symbol: &str) -> Result<Url, YfmcpError> {
    let mut url = Url::parse(base)
        .map_err(|e| YfmcpError::Data(format!("invalid endpoint {base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| YfmcpError::Data(format!("endpoint {base} cannot take a path")))?
        .pop_if_empty()
        .push(symbol);
    Ok(url)
}

#[async_trait]
impl YfChart for RealAdapter {
    async fn chart(&self, symbol: &str, query: &ChartQuery) -> Result<Value, YfmcpError> {
        let mut url = symbol_url(&self.endpoints.chart, symbol)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("range", &query.range)
                .append_pair("interval", &query.interval);
            if let Some(events) = &query.events {
                pairs.append_pair("events", events);
            }
        }
        self.fetcher.fetch_json(url.as_str(), false).await
    }
}

#[async_trait]
impl YfQuoteSummary for RealAdapter {
    async fn modules(&self, symbol: &str, modules: &[&str]) -> Result<Value, YfmcpError> {
        let mut url = symbol_url(&self.endpoints.quote_summary, symbol)?;
        url.query_pairs_mut()
            .append_pair("modules", &modules.join(","));
        self.fetcher.fetch_json(url.as_str(), true).await
    }
}

#[async_trait]
impl YfSearch for RealAdapter {
    async fn news(&self, query: &str, news_count: u32) -> Result<Value, YfmcpError> {
        let mut url = Url::parse(&self.endpoints.search)
            .map_err(|e| YfmcpError::Data(format!("invalid endpoint: {e}")))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("quotesCount", "0")
            .append_pair("newsCount", &news_count.to_string());
        self.fetcher.fetch_json(url.as_str(), false).await
    }
}

#[async_trait]
impl YfOptions for RealAdapter {
    async fn options(&self, symbol: &str, date: Option<i64>) -> Result<Value, YfmcpError> {
        let mut url = symbol_url(&self.endpoints.options, symbol)?;
        if let Some(date) = date {
            url.query_pairs_mut().append_pair("date", &date.to_string());
        }
        self.fetcher.fetch_json(url.as_str(), true).await
    }
}

/// Adapter that answers every call with `Unsupported`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnwiredAdapter;

#[async_trait]
impl YfChart for UnwiredAdapter {
    async fn chart(&self, _symbol: &str, _query: &ChartQuery) -> Result<Value, YfmcpError> {
        Err(YfmcpError::unsupported("chart"))
    }
}

#[async_trait]
impl YfQuoteSummary for UnwiredAdapter {
    async fn modules(&self, _symbol: &str, _modules: &[&str]) -> Result<Value, YfmcpError> {
        Err(YfmcpError::unsupported("quoteSummary"))
    }
}

#[async_trait]
impl YfSearch for UnwiredAdapter {
    async fn news(&self, _query: &str, _news_count: u32) -> Result<Value, YfmcpError> {
        Err(YfmcpError::unsupported("search"))
    }
}

#[async_trait]
impl YfOptions for UnwiredAdapter {
    async fn options(&self, _symbol: &str, _date: Option<i64>) -> Result<Value, YfmcpError> {
        Err(YfmcpError::unsupported("options"))
    }
}

/* -------- Test-only lightweight adapter constructors ------- */

#[cfg(feature = "test-adapters")]
impl dyn YfChart {
    /// Build a `YfChart` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn YfChart>
    where
        F: Send + Sync + 'static + Fn(String, ChartQuery) -> Result<Value, YfmcpError>,
    {
        struct FnChart<F>(F);
        #[async_trait]
        impl<F> YfChart for FnChart<F>
        where
            F: Send + Sync + 'static + Fn(String, ChartQuery) -> Result<Value, YfmcpError>,
        {
            async fn chart(&self, symbol: &str, query: &ChartQuery) -> Result<Value, YfmcpError> {
                (self.0)(symbol.to_string(), query.clone())
            }
        }
        Arc::new(FnChart(f))
    }
}

#[cfg(feature = "test-adapters")]
impl dyn YfQuoteSummary {
    /// Build a `YfQuoteSummary` from a closure receiving the symbol and module names (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn YfQuoteSummary>
    where
        F: Send + Sync + 'static + Fn(String, Vec<String>) -> Result<Value, YfmcpError>,
    {
        struct FnSummary<F>(F);
        #[async_trait]
        impl<F> YfQuoteSummary for FnSummary<F>
        where
            F: Send + Sync + 'static + Fn(String, Vec<String>) -> Result<Value, YfmcpError>,
        {
            async fn modules(&self, symbol: &str, modules: &[&str]) -> Result<Value, YfmcpError> {
                let owned = modules.iter().map(|m| (*m).to_string()).collect();
                (self.0)(symbol.to_string(), owned)
            }
        }
        Arc::new(FnSummary(f))
    }
}

#[cfg(feature = "test-adapters")]
impl dyn YfSearch {
    /// Build a `YfSearch` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn YfSearch>
    where
        F: Send + Sync + 'static + Fn(String) -> Result<Value, YfmcpError>,
    {
        struct FnSearch<F>(F);
        #[async_trait]
        impl<F> YfSearch for FnSearch<F>
        where
            F: Send + Sync + 'static + Fn(String) -> Result<Value, YfmcpError>,
        {
            async fn news(&self, query: &str, _news_count: u32) -> Result<Value, YfmcpError> {
                (self.0)(query.to_string())
            }
        }
        Arc::new(FnSearch(f))
    }
}

#[cfg(feature = "test-adapters")]
impl dyn YfOptions {
    /// Build a `YfOptions` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn YfOptions>
    where
        F: Send + Sync + 'static + Fn(String, Option<i64>) -> Result<Value, YfmcpError>,
    {
        struct FnOptions<F>(F);
        #[async_trait]
        impl<F> YfOptions for FnOptions<F>
        where
            F: Send + Sync + 'static + Fn(String, Option<i64>) -> Result<Value, YfmcpError>,
        {
            async fn options(&self, symbol: &str, date: Option<i64>) -> Result<Value, YfmcpError> {
                (self.0)(symbol.to_string(), date)
            }
        }
        Arc::new(FnOptions(f))
    }
}

/// Hand out shared adapter handles; unwired capabilities default to `Unsupported`.
pub trait CloneArcAdapters {
    /// Clone as `Arc<dyn YfChart>`.
    fn clone_arc_chart(&self) -> std::sync::Arc<dyn YfChart> {
        std::sync::Arc::new(UnwiredAdapter)
    }
    /// Clone as `Arc<dyn YfQuoteSummary>`.
    fn clone_arc_quote_summary(&self) -> std::sync::Arc<dyn YfQuoteSummary> {
        std::sync::Arc::new(UnwiredAdapter)
    }
    /// Clone as `Arc<dyn YfSearch>`.
    fn clone_arc_search(&self) -> std::sync::Arc<dyn YfSearch> {
        std::sync::Arc::new(UnwiredAdapter)
    }
    /// Clone as `Arc<dyn YfOptions>`.
    fn clone_arc_options(&self) -> std::sync::Arc<dyn YfOptions> {
        std::sync::Arc::new(UnwiredAdapter)
    }
}

impl CloneArcAdapters for RealAdapter {
    fn clone_arc_chart(&self) -> std::sync::Arc<dyn YfChart> {
        std::sync::Arc::new(self.clone()) as std::sync::Arc<dyn YfChart>
    }
    fn clone_arc_quote_summary(&self) -> std::sync::Arc<dyn YfQuoteSummary> {
        std::sync::Arc::new(self.clone()) as std::sync::Arc<dyn YfQuoteSummary>
    }
    fn clone_arc_search(&self) -> std::sync::Arc<dyn YfSearch> {
        std::sync::Arc::new(self.clone()) as std::sync::Arc<dyn YfSearch>
    }
    fn clone_arc_options(&self) -> std::sync::Arc<dyn YfOptions> {
        std::sync::Arc::new(self.clone()) as std::sync::Arc<dyn YfOptions>
    }
}
