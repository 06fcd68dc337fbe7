//! Shared command utilities
//!
//! - `load_config` - Resolve the forecast configuration
//! - `open_household` - Read a household snapshot
//! - `resolve_today` - Reference date from `--today` or the local clock

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use outlay_core::{ForecastConfig, Household};
use tracing::debug;

/// Load config from an explicit path, the user override, or built-in defaults
pub fn load_config(path: Option<&Path>) -> Result<ForecastConfig> {
    if let Some(p) = path {
        if !p.exists() {
            anyhow::bail!("Config file not found: {}", p.display());
        }
    }
    ForecastConfig::load(path).context("Failed to load forecast config")
}

/// Read the household snapshot the persistence API stores
pub fn open_household(path: &Path) -> Result<Household> {
    let household = Household::load(path)
        .with_context(|| format!("Failed to open household snapshot {}", path.display()))?;
    debug!(
        "Loaded household {}: {} transactions, {} recurring expenses, {} debts",
        household.household_id.as_deref().unwrap_or("(unnamed)"),
        household.transactions.len(),
        household.recurring_expenses.len(),
        household.debts.len()
    );
    Ok(household)
}

/// Reference date for a forecast
///
/// The clock is only read here; the core always receives an explicit date.
pub fn resolve_today(today: Option<&str>) -> Result<NaiveDate> {
    match today {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .context("Invalid --today date format (use YYYY-MM-DD)"),
        None => Ok(Local::now().date_naive()),
    }
}
