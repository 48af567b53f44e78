//! Configuration types shared by the fetch layer, the connector and the server.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What the fetcher does when an authenticated request cannot obtain credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AuthPolicy {
    /// Propagate `AuthUnavailable` to the caller.
    #[default]
    Required,
    /// Log a warning and send the request without cookie or crumb.
    BestEffort,
}

/// Settings for the process-wide cookie/crumb cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// How long a freshly acquired pair is treated as valid.
    pub ttl: Duration,
    /// Upper bound on one complete handshake (cookie, fallback and crumb steps).
    pub handshake_timeout: Duration,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30 * 60),
            handshake_timeout: Duration::from_secs(15),
        }
    }
}

/// Settings for the authenticated fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Behaviour when credentials cannot be acquired.
    pub auth_policy: AuthPolicy,
    /// Per-request timeout handed to the HTTP client.
    pub request_timeout: Duration,
    /// Number of body characters kept in `UpstreamHttp` errors.
    pub body_preview_chars: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            auth_policy: AuthPolicy::Required,
            request_timeout: Duration::from_secs(30),
            body_preview_chars: 200,
        }
    }
}

/// Upstream endpoint set.
///
/// The defaults are the production Yahoo Finance hosts. Tests substitute a
/// local mock server; the running server never reads these from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamEndpoints {
    /// Chart/history endpoint; the ticker is appended as a path segment.
    pub chart: String,
    /// Quote summary endpoint; the ticker is appended as a path segment.
    pub quote_summary: String,
    /// Search endpoint used for news.
    pub search: String,
    /// Options endpoint; the ticker is appended as a path segment.
    pub options: String,
    /// Page that issues the session cookie (requested without following redirects).
    pub cookie: String,
    /// Fallback page for the session cookie (requested following redirects).
    pub cookie_fallback: String,
    /// Endpoint that exchanges a cookie for a crumb.
    pub crumb: String,
}

impl Default for UpstreamEndpoints {
    fn default() -> Self {
        Self {
            chart: "https://query1.finance.yahoo.com/v8/finance/chart".into(),
            quote_summary: "https://query2.finance.yahoo.com/v10/finance/quoteSummary".into(),
            search: "https://query1.finance.yahoo.com/v1/finance/search".into(),
            options: "https://query2.finance.yahoo.com/v7/finance/options".into(),
            cookie: "https://fc.yahoo.com".into(),
            cookie_fallback: "https://finance.yahoo.com".into(),
            crumb: "https://query1.finance.yahoo.com/v1/test/getcrumb".into(),
        }
    }
}

impl UpstreamEndpoints {
    /// Point every endpoint at `base` using the same paths as production.
    ///
    /// Intended for tests against a local mock server.
    #[must_use]
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            chart: format!("{base}/v8/finance/chart"),
            quote_summary: format!("{base}/v10/finance/quoteSummary"),
            search: format!("{base}/v1/finance/search"),
            options: format!("{base}/v7/finance/options"),
            cookie: format!("{base}/cookie"),
            cookie_fallback: format!("{base}/"),
            crumb: format!("{base}/v1/test/getcrumb"),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    pub bind_address: String,
    /// Listen port.
    pub port: u16,
    /// Attach a permissive CORS layer.
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8787,
            enable_cors: true,
        }
    }
}

impl ServerConfig {
    /// Environment variable overriding the bind address.
    pub const BIND_ADDRESS_ENV: &'static str = "YFMCP_BIND_ADDRESS";
    /// Environment variable overriding the port.
    pub const PORT_ENV: &'static str = "YFMCP_PORT";

    /// Load settings from the environment, falling back to defaults for
    /// unset, blank or unparsable values.
    #[must_use]
    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env_or_default`] with an explicit lookup function.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(bind_address) = lookup(Self::BIND_ADDRESS_ENV)
            && !bind_address.trim().is_empty()
        {
            config.bind_address = bind_address.trim().to_string();
        }

        if let Some(port) = lookup(Self::PORT_ENV)
            && let Ok(parsed) = port.trim().parse::<u16>()
        {
            config.port = parsed;
        }

        config
    }
}

/// Aggregate configuration for a connector instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YfmcpConfig {
    /// Credential cache settings.
    pub credentials: CredentialConfig,
    /// Fetcher settings.
    pub fetch: FetchConfig,
    /// Upstream endpoints.
    pub endpoints: UpstreamEndpoints,
}
