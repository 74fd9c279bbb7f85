//! Tracing setup for the portfolio binary
//!
//! Usage:
//!   portfolio --debug ...                 # Debug logging to console
//!   RUST_LOG=portfolio_server=debug ...   # Fine-grained log control

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (ignored when RUST_LOG is set)
    pub debug: bool,
}

/// Initialize console tracing. Call once per process.
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    let fallback = if config.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
