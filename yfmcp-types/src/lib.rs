//! Shared error, configuration and tool-parameter types for the yfmcp workspace.
#![warn(missing_docs)]

mod config;
mod error;
mod params;

pub use config::{
    AuthPolicy, CredentialConfig, FetchConfig, ServerConfig, UpstreamEndpoints, YfmcpConfig,
};
pub use error::YfmcpError;
pub use params::{
    FinancialType, HistoryInterval, HistoryPeriod, HolderType, OptionType, RecommendationType,
};
