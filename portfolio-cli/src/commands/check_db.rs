//! Connectivity check
//!
//! Runs the same local-then-remote connection the server uses and prints
//! which target answered.

use anyhow::{Context, Result};
use clap::Parser;
use portfolio_core::PortfolioConfig;
use portfolio_server::ConnectionCache;
use serde_json::json;

#[derive(Parser, Debug)]
pub struct CheckDbArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run_check_db(args: CheckDbArgs, config: PortfolioConfig) -> Result<()> {
    let cache = ConnectionCache::from_config(&config.database);
    let store = cache
        .connect()
        .await
        .context("Database connection failed")?;
    let target = cache
        .active_target()
        .context("Connected without recording a target")?;

    if args.json {
        let report = json!({
            "target": target.as_str(),
            "backend": store.backend(),
            "database": config.database.name,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Connected to {} {} database '{}'",
            target.as_str(),
            store.backend(),
            config.database.name
        );
    }
    Ok(())
}
