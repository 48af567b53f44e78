//! Authenticated GET wrapper around the credential cache.

use std::sync::Arc;

use reqwest::header::COOKIE;
use serde_json::Value;
use yfmcp_types::{AuthPolicy, FetchConfig, YfmcpError};

use crate::auth::CredentialCache;
use crate::headers::build_client;

/// Issues upstream requests, attaching cookie and crumb when asked to.
#[derive(Debug, Clone)]
pub struct AuthenticatedFetcher {
    http: reqwest::Client,
    credentials: Arc<CredentialCache>,
    config: FetchConfig,
}

impl AuthenticatedFetcher {
    /// Build a fetcher with its own redirect-following HTTP client.
    ///
    /// # Errors
    /// Returns `Transport` if the HTTP client cannot be constructed.
    pub fn try_new(
        credentials: Arc<CredentialCache>,
        config: FetchConfig,
    ) -> Result<Self, YfmcpError> {
        let http = build_client(config.request_timeout, true)?;
        Ok(Self::with_client(http, credentials, config))
    }

    /// Build from a caller-provided HTTP client.
    #[must_use]
    pub const fn with_client(
        http: reqwest::Client,
        credentials: Arc<CredentialCache>,
        config: FetchConfig,
    ) -> Self {
        Self {
            http,
            credentials,
            config,
        }
    }

    /// Shared credential cache.
    #[must_use]
    pub const fn credentials(&self) -> &Arc<CredentialCache> {
        &self.credentials
    }

    /// GET `url`, returning the response when its status is a success.
    ///
    /// With `needs_auth`, credentials come from the cache: the cookie is sent
    /// as the `Cookie` header and the crumb is appended as a query parameter.
    ///
    /// # Errors
    /// - `AuthUnavailable` when credentials cannot be acquired under
    ///   [`AuthPolicy::Required`];
    /// - `Transport` when the request itself fails;
    /// - `UpstreamHttp` for a non-success status, with a bounded body preview.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "yfmcp::fetch", skip(self), fields(status))
    )]
    pub async fn fetch(&self, url: &str, needs_auth: bool) -> Result<reqwest::Response, YfmcpError> {
        let mut target = url.to_string();
        let mut cookie = None;

        if needs_auth {
            match self.credentials.acquire().await {
                Ok(state) => {
                    target = append_crumb(url, &state.crumb);
                    cookie = Some(state.cookie);
                }
                Err(_err) if self.config.auth_policy == AuthPolicy::BestEffort => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %_err, "credentials unavailable, sending unauthenticated request");
                }
                Err(err) => return Err(err),
            }
        }

        let mut request = self.http.get(&target);
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        let resp = request.send().await.map_err(crate::transport_error)?;

        let status = resp.status();
        #[cfg(feature = "tracing")]
        tracing::Span::current().record("status", status.as_u16());
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(YfmcpError::upstream_http(
                status.as_u16(),
                body_preview(&body, self.config.body_preview_chars),
            ));
        }
        Ok(resp)
    }

    /// GET `url` and parse the body as JSON.
    ///
    /// # Errors
    /// Everything [`Self::fetch`] returns, plus `Data` for a body that is not JSON.
    pub async fn fetch_json(&self, url: &str, needs_auth: bool) -> Result<Value, YfmcpError> {
        let resp = self.fetch(url, needs_auth).await?;
        let body = resp.text().await.map_err(crate::transport_error)?;
        serde_json::from_str(&body)
            .map_err(|e| YfmcpError::Data(format!("upstream body is not valid JSON: {e}")))
    }
}

/// Append `crumb=<encoded>` to `url`, using `&` when a query string already exists.
#[must_use]
pub fn append_crumb(url: &str, crumb: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    let encoded: String = url::form_urlencoded::byte_serialize(crumb.as_bytes()).collect();
    format!("{url}{separator}crumb={encoded}")
}

/// First `max_chars` characters of `body`.
#[must_use]
pub fn body_preview(body: &str, max_chars: usize) -> String {
    body.chars().take(max_chars).collect()
}
