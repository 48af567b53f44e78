//! yfmcp-yahoo
//!
//! Connector that exposes the nine Yahoo Finance tool operations on top of the
//! endpoint adapters in [`adapter`]. Each operation fetches through an adapter,
//! checks the response envelope and hands the payload to a pure shaping
//! function in [`shape`].
#![warn(missing_docs)]

/// Endpoint adapters and the production adapter backed by the authenticated fetcher.
pub mod adapter;
/// Builder for a production connector.
pub mod builder;
/// Payload shaping, one module per tool.
pub mod shape;

use std::sync::Arc;

use adapter::{ChartQuery, CloneArcAdapters, YfChart, YfOptions, YfQuoteSummary, YfSearch};
use serde_json::Value;
use yfmcp_core::{Clock, SystemClock};
use yfmcp_types::{
    FinancialType, HistoryInterval, HistoryPeriod, HolderType, OptionType, RecommendationType,
    YfmcpError,
};

pub use builder::YahooFinanceBuilder;
pub use shape::recommendations::DEFAULT_MONTHS_BACK;

/// Outcome of an option chain lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionChain {
    /// Contracts for the requested side and expiration.
    Contracts(Vec<Value>),
    /// The date is not a listed expiration; carries guidance text for the caller.
    NoChain(String),
}

/// Yahoo Finance connector.
pub struct YahooFinance {
    chart: Arc<dyn YfChart>,
    summary: Arc<dyn YfQuoteSummary>,
    search: Arc<dyn YfSearch>,
    options: Arc<dyn YfOptions>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for YahooFinance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooFinance").finish_non_exhaustive()
    }
}

impl YahooFinance {
    /// Builder for a production connector talking to the live endpoints.
    #[must_use]
    pub fn builder() -> YahooFinanceBuilder {
        YahooFinanceBuilder::new()
    }

    /// Build from any adapter set, using the wall clock.
    pub fn from_adapter<A: CloneArcAdapters + ?Sized>(adapter: &A) -> Self {
        Self::from_adapter_with_clock(adapter, Arc::new(SystemClock))
    }

    /// Build from any adapter set with an explicit clock (drives the
    /// recommendation cutoff).
    pub fn from_adapter_with_clock<A: CloneArcAdapters + ?Sized>(
        adapter: &A,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            chart: adapter.clone_arc_chart(),
            summary: adapter.clone_arc_quote_summary(),
            search: adapter.clone_arc_search(),
            options: adapter.clone_arc_options(),
            clock,
        }
    }

    fn looks_like_not_found(msg: &str) -> bool {
        let m = msg.to_ascii_lowercase();
        m.contains("not found") || m.contains("no data found")
    }

    fn normalize_error(e: YfmcpError, ticker: &str) -> YfmcpError {
        match e {
            YfmcpError::UpstreamHttp { status: 404, .. } => YfmcpError::not_found(ticker),
            YfmcpError::UpstreamSemantic { ref description }
                if Self::looks_like_not_found(description) =>
            {
                YfmcpError::not_found(ticker)
            }
            other => other,
        }
    }

    fn ticker(raw: &str) -> Result<&str, YfmcpError> {
        let ticker = raw.trim();
        if ticker.is_empty() {
            return Err(YfmcpError::InvalidArg("Ticker symbol is required.".into()));
        }
        Ok(ticker)
    }

    async fn chart_result(&self, ticker: &str, query: &ChartQuery) -> Result<Value, YfmcpError> {
        let payload = self.chart.chart(ticker, query).await?;
        shape::first_result(&payload, "chart", ticker)
    }

    async fn summary_result(&self, ticker: &str, modules: &[&str]) -> Result<Value, YfmcpError> {
        let payload = self.summary.modules(ticker, modules).await?;
        shape::first_result(&payload, "quoteSummary", ticker)
    }

    async fn options_result(&self, ticker: &str, date: Option<i64>) -> Result<Value, YfmcpError> {
        let payload = self.options.options(ticker, date).await?;
        shape::first_result(&payload, "optionChain", ticker)
    }

    /// OHLCV rows for `period` at `interval`.
    ///
    /// # Errors
    /// `InvalidArg` for an empty ticker, `NotFound` for an unknown one, or the
    /// underlying fetch failure.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "yfmcp::yahoo::history", skip(self))
    )]
    pub async fn historical_prices(
        &self,
        ticker: &str,
        period: HistoryPeriod,
        interval: HistoryInterval,
    ) -> Result<Vec<Value>, YfmcpError> {
        let ticker = Self::ticker(ticker)?;
        let query = ChartQuery::bars(period.as_str(), interval.as_str());
        let result = self
            .chart_result(ticker, &query)
            .await
            .map_err(|e| Self::normalize_error(e, ticker))?;
        shape::history::rows(&result)
    }

    /// Merged company profile, pricing and key statistics.
    ///
    /// # Errors
    /// As [`Self::historical_prices`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "yfmcp::yahoo::info", skip(self))
    )]
    pub async fn stock_info(&self, ticker: &str) -> Result<Value, YfmcpError> {
        let ticker = Self::ticker(ticker)?;
        let result = self
            .summary_result(ticker, shape::info::INFO_MODULES)
            .await
            .map_err(|e| Self::normalize_error(e, ticker))?;
        Ok(shape::info::merge(&result))
    }

    /// Recent news rendered as text blocks.
    ///
    /// # Errors
    /// As [`Self::historical_prices`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "yfmcp::yahoo::news", skip(self))
    )]
    pub async fn news(&self, ticker: &str) -> Result<String, YfmcpError> {
        let ticker = Self::ticker(ticker)?;
        let payload = self
            .search
            .news(ticker, shape::news::NEWS_COUNT)
            .await
            .map_err(|e| Self::normalize_error(e, ticker))?;
        if let Some(finance) = payload.get("finance") {
            shape::check_embedded_error(finance)?;
        }
        Ok(shape::news::render(&payload, ticker))
    }

    /// Full-history dividends and splits, ascending by date.
    ///
    /// # Errors
    /// As [`Self::historical_prices`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "yfmcp::yahoo::actions", skip(self))
    )]
    pub async fn stock_actions(&self, ticker: &str) -> Result<Vec<Value>, YfmcpError> {
        let ticker = Self::ticker(ticker)?;
        let result = self
            .chart_result(ticker, &ChartQuery::actions())
            .await
            .map_err(|e| Self::normalize_error(e, ticker))?;
        Ok(shape::actions::rows(&result))
    }

    /// Flattened statements of the requested kind.
    ///
    /// # Errors
    /// As [`Self::historical_prices`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "yfmcp::yahoo::financials", skip(self))
    )]
    pub async fn financial_statement(
        &self,
        ticker: &str,
        kind: FinancialType,
    ) -> Result<Vec<Value>, YfmcpError> {
        let ticker = Self::ticker(ticker)?;
        let result = self
            .summary_result(ticker, &[kind.module()])
            .await
            .map_err(|e| Self::normalize_error(e, ticker))?;
        Ok(shape::financials::statements(&result, kind))
    }

    /// Holder view of the requested kind.
    ///
    /// # Errors
    /// As [`Self::historical_prices`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "yfmcp::yahoo::holders", skip(self))
    )]
    pub async fn holder_info(&self, ticker: &str, kind: HolderType) -> Result<Value, YfmcpError> {
        let ticker = Self::ticker(ticker)?;
        let result = self
            .summary_result(ticker, &[kind.module()])
            .await
            .map_err(|e| Self::normalize_error(e, ticker))?;
        Ok(shape::holders::view(&result, kind))
    }

    /// Listed option expirations as `YYYY-MM-DD`.
    ///
    /// # Errors
    /// As [`Self::historical_prices`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "yfmcp::yahoo::expirations", skip(self))
    )]
    pub async fn option_expiration_dates(&self, ticker: &str) -> Result<Vec<String>, YfmcpError> {
        let ticker = Self::ticker(ticker)?;
        let result = self
            .options_result(ticker, None)
            .await
            .map_err(|e| Self::normalize_error(e, ticker))?;
        Ok(shape::options::expiration_dates(&result))
    }

    /// Contracts for one side of the chain expiring on `expiration_date`.
    ///
    /// The date is checked against the listed expirations first; an unlisted
    /// date yields [`OptionChain::NoChain`] without fetching a chain.
    ///
    /// # Errors
    /// As [`Self::historical_prices`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "yfmcp::yahoo::option_chain", skip(self))
    )]
    pub async fn option_chain(
        &self,
        ticker: &str,
        expiration_date: &str,
        side: OptionType,
    ) -> Result<OptionChain, YfmcpError> {
        let ticker = Self::ticker(ticker)?;
        let listing = self
            .options_result(ticker, None)
            .await
            .map_err(|e| Self::normalize_error(e, ticker))?;
        let Some(epoch) = shape::options::find_expiration(&listing, expiration_date.trim()) else {
            return Ok(OptionChain::NoChain(shape::options::no_chain_message(
                ticker,
                expiration_date,
            )));
        };
        let chain = self
            .options_result(ticker, Some(epoch))
            .await
            .map_err(|e| Self::normalize_error(e, ticker))?;
        Ok(OptionChain::Contracts(shape::options::contracts(&chain, side)))
    }

    /// Analyst trend, or recent upgrades/downgrades deduplicated by firm.
    ///
    /// # Errors
    /// As [`Self::historical_prices`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "yfmcp::yahoo::recommendations", skip(self))
    )]
    pub async fn recommendations(
        &self,
        ticker: &str,
        kind: RecommendationType,
        months_back: u32,
    ) -> Result<Vec<Value>, YfmcpError> {
        let ticker = Self::ticker(ticker)?;
        let module = match kind {
            RecommendationType::Recommendations => "recommendationTrend",
            RecommendationType::UpgradesDowngrades => "upgradeDowngradeHistory",
        };
        let result = self
            .summary_result(ticker, &[module])
            .await
            .map_err(|e| Self::normalize_error(e, ticker))?;
        Ok(match kind {
            RecommendationType::Recommendations => shape::recommendations::trend(&result),
            RecommendationType::UpgradesDowngrades => {
                let cutoff = shape::recommendations::cutoff(self.clock.now(), months_back);
                shape::recommendations::upgrades_downgrades(&result, cutoff)
            }
        })
    }
}
