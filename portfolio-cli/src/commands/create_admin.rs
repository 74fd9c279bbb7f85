//! Admin account creation
//!
//! The password comes from `--password` or `PORTFOLIO_ADMIN_PASSWORD`; it is
//! never echoed or logged.

use anyhow::{Context, Result};
use clap::Parser;
use portfolio_core::PortfolioConfig;
use portfolio_server::auth::{Auth, AuthSettings};
use portfolio_server::ConnectionCache;

#[derive(Parser, Debug)]
pub struct CreateAdminArgs {
    /// Login email
    #[arg(long)]
    pub email: String,

    /// Display name
    #[arg(long, default_value = "Admin")]
    pub name: String,

    /// Password (8-128 characters)
    #[arg(long, env = "PORTFOLIO_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run_create_admin(args: CreateAdminArgs, config: PortfolioConfig) -> Result<()> {
    let cache = ConnectionCache::from_config(&config.database);
    let store = cache
        .connect()
        .await
        .context("Database connection failed")?;
    let settings = AuthSettings::from(&config.auth);

    let user = Auth::new(store.as_ref(), &settings)
        .create_user(&args.email, &args.name, &args.password)
        .await
        .with_context(|| format!("Failed to create admin {}", args.email))?;

    println!("Created admin {} ({})", user.email, user.id);
    Ok(())
}
