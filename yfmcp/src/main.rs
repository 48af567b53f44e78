use tracing_subscriber::EnvFilter;
use yfmcp_types::{ServerConfig, YfmcpError};
use yfmcp_yahoo::YahooFinance;

#[cfg(not(feature = "mock"))]
fn connector() -> Result<YahooFinance, YfmcpError> {
    YahooFinance::builder().build()
}

#[cfg(feature = "mock")]
fn connector() -> Result<YahooFinance, YfmcpError> {
    tracing::warn!("serving fixture data from yfmcp-mock");
    Ok(yfmcp_mock::MockAdapter::connector())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG wins; otherwise info.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env_or_default();
    tracing::debug!(?config, "server configuration");

    let yahoo = connector()?;
    yfmcp::serve(config, yahoo).await?;
    Ok(())
}
