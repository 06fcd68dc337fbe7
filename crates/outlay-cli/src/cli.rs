//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Outlay - See what's about to leave your account
#[derive(Parser)]
#[command(name = "outlay")]
#[command(about = "Upcoming payment forecaster for household finances", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Forecast heuristics config (TOML)
    ///
    /// Defaults to ~/.local/share/outlay/config/forecast.toml when present,
    /// otherwise the built-in configuration.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show payments due within the lookahead window
    Forecast {
        /// Household snapshot (JSON)
        #[arg(short, long)]
        data: PathBuf,

        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<String>,

        /// Lookahead window in days (overrides config)
        #[arg(short, long)]
        window: Option<u32>,

        /// Only show one source (recurring, debt, subscription)
        #[arg(long)]
        source: Option<String>,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List subscriptions detected in transaction history
    Subscriptions {
        /// Household snapshot (JSON)
        #[arg(short, long)]
        data: PathBuf,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Average charge for a merchant (matched by normalized name)
    Cost {
        /// Household snapshot (JSON)
        #[arg(short, long)]
        data: PathBuf,

        /// Merchant name, in any form ("Spotify", "PAYPAL *SPOTIFY")
        merchant: String,
    },

    /// Show the normalized form of merchant descriptors
    Normalize {
        /// Raw descriptors
        #[arg(required = true)]
        names: Vec<String>,
    },
}
