use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{COOKIE, SET_COOKIE};
use yfmcp_types::{UpstreamEndpoints, YfmcpError};

use super::{CredentialSource, Credentials};
use crate::headers::build_client;

/// Two-step Yahoo handshake: session cookie, then crumb.
///
/// The cookie is first requested from the cookie-issuing page without
/// following its redirect. Some runtimes never see a `Set-Cookie` there, so the
/// main page is tried next with redirects followed.
#[derive(Debug, Clone)]
pub struct YahooHandshake {
    no_redirect: reqwest::Client,
    follow: reqwest::Client,
    cookie_url: String,
    fallback_url: String,
    crumb_url: String,
}

impl YahooHandshake {
    /// Build the handshake with its own HTTP clients.
    ///
    /// # Errors
    /// Returns `Transport` if an HTTP client cannot be constructed.
    pub fn try_new(
        endpoints: &UpstreamEndpoints,
        request_timeout: std::time::Duration,
    ) -> Result<Self, YfmcpError> {
        Ok(Self::with_clients(
            build_client(request_timeout, false)?,
            build_client(request_timeout, true)?,
            endpoints,
        ))
    }

    /// Build from caller-provided clients. `no_redirect` must not follow redirects.
    #[must_use]
    pub fn with_clients(
        no_redirect: reqwest::Client,
        follow: reqwest::Client,
        endpoints: &UpstreamEndpoints,
    ) -> Self {
        Self {
            no_redirect,
            follow,
            cookie_url: endpoints.cookie.clone(),
            fallback_url: endpoints.cookie_fallback.clone(),
            crumb_url: endpoints.crumb.clone(),
        }
    }

    async fn cookie_from(client: &reqwest::Client, url: &str) -> Option<String> {
        match client.get(url).send().await {
            Ok(resp) => extract_cookie_pairs(
                resp.headers()
                    .get_all(SET_COOKIE)
                    .iter()
                    .filter_map(|v| v.to_str().ok()),
            ),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(url, error = %_err, "cookie request failed");
                None
            }
        }
    }

    async fn session_cookie(&self) -> Result<String, YfmcpError> {
        if let Some(cookie) = Self::cookie_from(&self.no_redirect, &self.cookie_url).await {
            return Ok(cookie);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(url = %self.fallback_url, "no cookie from primary page, trying fallback");
        Self::cookie_from(&self.follow, &self.fallback_url)
            .await
            .ok_or_else(|| YfmcpError::auth_unavailable("no session cookie was issued"))
    }

    async fn crumb(&self, cookie: &str) -> Result<String, YfmcpError> {
        let resp = self
            .follow
            .get(&self.crumb_url)
            .header(COOKIE, cookie)
            .send()
            .await
            .map_err(|e| YfmcpError::auth_unavailable(format!("crumb request failed: {e}")))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| YfmcpError::auth_unavailable(format!("crumb body unreadable: {e}")))?;
        validate_crumb(status, body)
    }
}

#[async_trait]
impl CredentialSource for YahooHandshake {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "yfmcp::auth::handshake", skip(self))
    )]
    async fn handshake(&self) -> Result<Credentials, YfmcpError> {
        let cookie = self.session_cookie().await?;
        let crumb = self.crumb(&cookie).await?;
        Ok(Credentials { cookie, crumb })
    }
}

/// Collect `name=value` pairs from `Set-Cookie` header values.
///
/// Each value may hold several cookies separated by `,`; attributes after the
/// first `;` are dropped. Fragments without `=` (such as the tail of an
/// `Expires` date split on its comma) are skipped. Returns `None` when nothing
/// usable remains.
pub fn extract_cookie_pairs<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let pairs: Vec<&str> = values
        .into_iter()
        .flat_map(|v| v.split(','))
        .filter_map(|cookie| cookie.split(';').next())
        .map(str::trim)
        .filter(|pair| pair.find('=').is_some_and(|idx| idx > 0))
        .collect();
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}

/// Accept a crumb response only when it looks like a bare token.
///
/// The upstream sometimes answers 200 with an HTML error page, so the body is
/// rejected when empty, when it contains `<`, or when it contains `error`.
///
/// # Errors
/// Returns `AuthUnavailable` for a non-success status or a rejected body.
pub fn validate_crumb(status: StatusCode, body: String) -> Result<String, YfmcpError> {
    if !status.is_success() {
        return Err(YfmcpError::auth_unavailable(format!(
            "crumb endpoint returned HTTP {}",
            status.as_u16()
        )));
    }
    if body.is_empty() || body.contains('<') || body.contains("error") {
        return Err(YfmcpError::auth_unavailable("crumb endpoint returned an invalid crumb"));
    }
    Ok(body)
}
