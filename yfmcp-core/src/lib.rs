//! yfmcp-core
//!
//! Authenticated access to the unofficial Yahoo Finance endpoints.
//!
//! - `auth`: the cookie/crumb handshake and the time-bound cache guarding it.
//! - `fetch`: the GET wrapper that attaches credentials and classifies responses.
//! - `json`: structural transforms over upstream payloads.
//!
//! Async runtime (Tokio)
//! ---------------------
//! The credential cache uses `tokio::sync::Mutex` and `tokio::time::timeout`,
//! so callers must run under a Tokio 1.x runtime with the time driver enabled.
#![warn(missing_docs)]

/// Credential types, the handshake and the credential cache.
pub mod auth;
/// Time source used for credential expiry.
pub mod clock;
/// The authenticated fetcher.
pub mod fetch;
/// Browser header set and HTTP client construction.
pub mod headers;
/// JSON transforms.
pub mod json;

pub use auth::{CredentialCache, CredentialSource, CredentialState, Credentials, YahooHandshake};
pub use clock::{Clock, SystemClock};
pub use fetch::AuthenticatedFetcher;
pub use yfmcp_types::*;

/// Map an HTTP client failure to `Transport`.
#[must_use]
pub fn transport_error(err: reqwest::Error) -> YfmcpError {
    YfmcpError::Transport(err.to_string())
}
