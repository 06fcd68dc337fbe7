//! Outlay CLI - Upcoming payment forecaster
//!
//! Usage:
//!   outlay forecast --data household.json              Payments due in the next 14 days
//!   outlay forecast --data household.json --source debt  Only debt repayments
//!   outlay subscriptions --data household.json         Subscriptions detected in history
//!   outlay cost --data household.json Spotify          Average charge for a merchant
//!   outlay normalize "PAYPAL *SPOTIFY"                 Show the canonical merchant name

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Forecast {
            data,
            today,
            window,
            source,
            json,
        } => commands::cmd_forecast(
            &config,
            &data,
            today.as_deref(),
            window,
            source.as_deref(),
            json,
        ),
        Commands::Subscriptions { data, json } => {
            commands::cmd_subscriptions(&config, &data, json)
        }
        Commands::Cost { data, merchant } => commands::cmd_cost(&config, &data, &merchant),
        Commands::Normalize { names } => commands::cmd_normalize(&config, &names),
    }
}
