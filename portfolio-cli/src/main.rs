//! portfolio CLI - runs the portfolio JSON API and administers its store
//!
//! - `serve`: HTTP API (content CRUD, inbox, admin auth)
//! - `check-db`: connect with local-then-remote fallback and report the target
//! - `create-admin`: add an admin account

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use portfolio_core::PortfolioConfig;

mod commands;
mod tracing_setup;

use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "portfolio",
    author,
    version,
    about = "JSON API backend for a personal portfolio site",
    long_about = "Serves portfolio content (profile, projects, experience, education, \
                  recommendations, social links, page copy) and an admin inbox over a \
                  MongoDB document store, falling back from a local to a remote instance."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.portfolio/config.toml)
    #[arg(long, short = 'c', global = true, env = "PORTFOLIO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Connect to the document store and report which target answered
    CheckDb(commands::check_db::CheckDbArgs),
    /// Create an admin account
    CreateAdmin(commands::create_admin::CreateAdminArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&TracingConfig { debug: cli.debug }).ok();

    let config = PortfolioConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config).await?,
        Commands::CheckDb(args) => commands::run_check_db(args, config).await?,
        Commands::CreateAdmin(args) => commands::run_create_admin(args, config).await?,
    }
    Ok(())
}
