//! Cookie/crumb credentials and the process-wide cache that guards them.
//!
//! The cache owns at most one [`CredentialState`]. [`CredentialCache::acquire`]
//! is the only way to read or replace it:
//!
//! - a valid state is returned unchanged without network I/O;
//! - an expired state is discarded before a refresh is attempted, so a failed
//!   refresh leaves the cache empty rather than holding a stale pair;
//! - the lock is held across the refresh, so concurrent callers that miss
//!   share the one in-flight handshake instead of racing their own.

mod handshake;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;
use yfmcp_types::{CredentialConfig, YfmcpError};

use crate::clock::{Clock, SystemClock};

pub use handshake::{YahooHandshake, extract_cookie_pairs, validate_crumb};

/// A cookie and the crumb it unlocked. Only ever constructed as a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Value for the `Cookie` request header (`name=value; name=value`).
    pub cookie: String,
    /// Anti-scraping token passed as the `crumb` query parameter.
    pub crumb: String,
}

impl Credentials {
    /// Pair a cookie with its crumb.
    pub fn new(cookie: impl Into<String>, crumb: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
            crumb: crumb.into(),
        }
    }
}

/// Cached credentials together with their expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialState {
    /// Value for the `Cookie` request header.
    pub cookie: String,
    /// Crumb query parameter value.
    pub crumb: String,
    /// Instant after which the pair is treated as invalid.
    pub expires_at: DateTime<Utc>,
}

impl CredentialState {
    fn issue(credentials: Credentials, expires_at: DateTime<Utc>) -> Self {
        Self {
            cookie: credentials.cookie,
            crumb: credentials.crumb,
            expires_at,
        }
    }

    /// True while `now` is strictly before `expires_at`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Performs the upstream handshake that yields a fresh cookie/crumb pair.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Run the full handshake. Steps must run sequentially.
    async fn handshake(&self) -> Result<Credentials, YfmcpError>;
}

/// Time-bound, single-flight cache of one [`CredentialState`].
pub struct CredentialCache {
    source: Arc<dyn CredentialSource>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    handshake_timeout: Duration,
    state: Mutex<Option<CredentialState>>,
}

impl std::fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCache")
            .field("ttl", &self.ttl)
            .field("handshake_timeout", &self.handshake_timeout)
            .finish_non_exhaustive()
    }
}

impl CredentialCache {
    /// Cache backed by the wall clock.
    #[must_use]
    pub fn new(source: Arc<dyn CredentialSource>, config: &CredentialConfig) -> Self {
        Self::with_clock(source, Arc::new(SystemClock), config)
    }

    /// Cache with an explicit clock (tests inject a controllable one).
    #[must_use]
    pub fn with_clock(
        source: Arc<dyn CredentialSource>,
        clock: Arc<dyn Clock>,
        config: &CredentialConfig,
    ) -> Self {
        Self {
            source,
            clock,
            ttl: TimeDelta::from_std(config.ttl).unwrap_or(TimeDelta::MAX),
            handshake_timeout: config.handshake_timeout,
            state: Mutex::new(None),
        }
    }

    /// Return valid credentials, refreshing them first when absent or expired.
    ///
    /// # Errors
    /// Returns `AuthUnavailable` when the handshake fails or exceeds the
    /// configured handshake timeout. The cache is left empty in that case.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "yfmcp::auth::acquire", skip(self))
    )]
    pub async fn acquire(&self) -> Result<CredentialState, YfmcpError> {
        let mut slot = self.state.lock().await;

        if let Some(state) = slot.as_ref()
            && state.is_valid_at(self.clock.now())
        {
            #[cfg(feature = "tracing")]
            tracing::trace!(expires_at = %state.expires_at, "credential cache hit");
            return Ok(state.clone());
        }

        // Expired pairs are never reused, even if the refresh below fails.
        *slot = None;

        let credentials =
            match tokio::time::timeout(self.handshake_timeout, self.source.handshake()).await {
                Ok(Ok(credentials)) => credentials,
                Ok(Err(err)) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %err, "credential refresh failed");
                    return Err(err);
                }
                Err(_) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        timeout_ms = u64::try_from(self.handshake_timeout.as_millis())
                            .unwrap_or(u64::MAX),
                        "credential handshake timed out"
                    );
                    return Err(YfmcpError::auth_unavailable(format!(
                        "handshake timed out after {}ms",
                        self.handshake_timeout.as_millis()
                    )));
                }
            };

        let issued_at = self.clock.now();
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let state = CredentialState::issue(credentials, expires_at);

        #[cfg(feature = "tracing")]
        tracing::info!(expires_at = %state.expires_at, "credentials refreshed");

        *slot = Some(state.clone());
        Ok(state)
    }

    /// Current cached state, if any, without refreshing. May be expired.
    pub async fn snapshot(&self) -> Option<CredentialState> {
        self.state.lock().await.clone()
    }
}
