use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the yfmcp workspace.
///
/// Fetch and shaping code returns this type; only the tool edge turns it into
/// text for the caller.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum YfmcpError {
    /// The cookie/crumb handshake could not produce a usable credential pair.
    #[error("authentication unavailable: {reason}")]
    AuthUnavailable {
        /// What went wrong during the handshake.
        reason: String,
    },

    /// The upstream answered a data request with a non-success status.
    #[error("upstream returned HTTP {status}: {body_preview}")]
    UpstreamHttp {
        /// HTTP status code.
        status: u16,
        /// First characters of the response body.
        body_preview: String,
    },

    /// The upstream answered 200 but embedded an application-level error object.
    #[error("upstream rejected the request: {description}")]
    UpstreamSemantic {
        /// Description taken from the embedded error object.
        description: String,
    },

    /// The upstream recognised the request but returned no result for the ticker.
    #[error("Ticker {ticker} not found.")]
    NotFound {
        /// Ticker symbol as supplied by the caller.
        ticker: String,
    },

    /// Invalid tool argument. The message is shown to the caller verbatim.
    #[error("{0}")]
    InvalidArg(String),

    /// Network, TLS or timeout failure reported by the HTTP client.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Issues with the returned payload (malformed JSON, missing fields, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// The requested capability is not wired into this connector instance.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// Capability label, e.g. "options".
        capability: String,
    },
}

impl YfmcpError {
    /// Helper: build an `AuthUnavailable` error.
    pub fn auth_unavailable(reason: impl Into<String>) -> Self {
        Self::AuthUnavailable {
            reason: reason.into(),
        }
    }

    /// Helper: build an `UpstreamHttp` error.
    pub fn upstream_http(status: u16, body_preview: impl Into<String>) -> Self {
        Self::UpstreamHttp {
            status,
            body_preview: body_preview.into(),
        }
    }

    /// Helper: build an `UpstreamSemantic` error.
    pub fn upstream_semantic(description: impl Into<String>) -> Self {
        Self::UpstreamSemantic {
            description: description.into(),
        }
    }

    /// Helper: build an `Unsupported` error for a capability label.
    pub fn unsupported(capability: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: capability.into(),
        }
    }

    /// Helper: build a `NotFound` error for a ticker.
    pub fn not_found(ticker: impl Into<String>) -> Self {
        Self::NotFound {
            ticker: ticker.into(),
        }
    }

    /// Returns true for errors whose message is meant to be read as-is rather
    /// than as a failure report (unknown ticker, rejected argument).
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InvalidArg(_))
    }
}
