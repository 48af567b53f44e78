use std::sync::Arc;

use yfmcp_core::{
    AuthenticatedFetcher, Clock, CredentialCache, CredentialSource, SystemClock, YahooHandshake,
};
use yfmcp_types::{AuthPolicy, UpstreamEndpoints, YfmcpConfig, YfmcpError};

use crate::YahooFinance;
use crate::adapter::RealAdapter;

/// Builder for a [`YahooFinance`] connector backed by [`RealAdapter`].
///
/// One builder produces one credential cache; every adapter of the built
/// connector shares it.
#[derive(Default)]
pub struct YahooFinanceBuilder {
    config: YfmcpConfig,
    clock: Option<Arc<dyn Clock>>,
    credential_source: Option<Arc<dyn CredentialSource>>,
}

impl YahooFinanceBuilder {
    /// Builder with production defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: YfmcpConfig) -> Self {
        self.config = config;
        self
    }

    /// Point every upstream request (including the handshake) at `endpoints`.
    #[must_use]
    pub fn endpoints(mut self, endpoints: UpstreamEndpoints) -> Self {
        self.config.endpoints = endpoints;
        self
    }

    /// Behaviour when credentials cannot be acquired.
    #[must_use]
    pub fn auth_policy(mut self, policy: AuthPolicy) -> Self {
        self.config.fetch.auth_policy = policy;
        self
    }

    /// Clock for credential expiry and the recommendation cutoff.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Replace the Yahoo handshake with another credential source.
    #[must_use]
    pub fn credential_source(mut self, source: Arc<dyn CredentialSource>) -> Self {
        self.credential_source = Some(source);
        self
    }

    /// Build the connector.
    ///
    /// # Errors
    /// Returns `Transport` if an HTTP client cannot be constructed.
    pub fn build(self) -> Result<YahooFinance, YfmcpError> {
        let Self {
            config,
            clock,
            credential_source,
        } = self;
        let clock = clock.unwrap_or_else(|| Arc::new(SystemClock));
        let source = match credential_source {
            Some(source) => source,
            None => Arc::new(YahooHandshake::try_new(
                &config.endpoints,
                config.fetch.request_timeout,
            )?),
        };
        let cache = CredentialCache::with_clock(source, Arc::clone(&clock), &config.credentials);
        let fetcher = AuthenticatedFetcher::try_new(Arc::new(cache), config.fetch)?;
        let adapter = RealAdapter::new(Arc::new(fetcher), config.endpoints);
        Ok(YahooFinance::from_adapter_with_clock(&adapter, clock))
    }
}
