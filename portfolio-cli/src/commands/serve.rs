//! HTTP server command
//!
//! Flags override the config file and environment.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use portfolio_core::PortfolioConfig;
use portfolio_server::{run_server, AppState, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default from config: 127.0.0.1:3000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Local MongoDB URI, tried first (`memory://` for an in-process store)
    #[arg(long)]
    pub local_uri: Option<String>,

    /// Remote MongoDB URI, used when the local one is unreachable
    #[arg(long)]
    pub remote_uri: Option<String>,
}

impl ServeArgs {
    fn apply(self, config: &mut PortfolioConfig) {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if self.cors_permissive {
            config.server.cors_permissive = true;
        }
        if let Some(uri) = self.local_uri {
            config.database.local_uri = uri;
        }
        if let Some(uri) = self.remote_uri {
            config.database.remote_uri = Some(uri);
        }
    }
}

/// Run the HTTP server until Ctrl+C or SIGTERM
pub async fn run_serve(args: ServeArgs, mut config: PortfolioConfig) -> Result<()> {
    args.apply(&mut config);
    config.check().context("Invalid configuration")?;

    tracing::info!(
        bind = %config.server.bind,
        remote_fallback = config.database.remote_uri.is_some(),
        "Starting portfolio server"
    );

    let state = Arc::new(AppState::from_config(&config));
    run_server(state, ServerConfig::from(&config))
        .await
        .context("Server error")?;

    Ok(())
}
