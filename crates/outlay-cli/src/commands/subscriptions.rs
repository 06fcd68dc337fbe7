//! Subscription command implementations

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use outlay_core::{ForecastConfig, Forecaster, MerchantNormalizer};

use super::{open_household, truncate};

pub fn cmd_subscriptions(config: &ForecastConfig, data: &Path, json: bool) -> Result<()> {
    println!("{}", subscriptions_report(config, data, json)?);
    Ok(())
}

/// Detected subscriptions as a table or JSON
pub fn subscriptions_report(config: &ForecastConfig, data: &Path, json: bool) -> Result<String> {
    let household = open_household(data)?;
    // Same detector the forecast uses
    let forecaster = Forecaster::new(config.clone()).context("Invalid forecast configuration")?;

    let subscriptions = forecaster
        .detector()
        .detect_subscriptions(&household.transactions);

    if json {
        return Ok(serde_json::to_string_pretty(&subscriptions)?);
    }

    if subscriptions.is_empty() {
        return Ok(format!(
            "No subscriptions detected in {} transactions.",
            household.transactions.len()
        ));
    }

    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "📋 Detected Subscriptions");
    let _ = write!(
        out,
        "   ─────────────────────────────────────────────────────────────"
    );

    for sub in &subscriptions {
        let _ = write!(
            out,
            "\n   {:24} │ {:>8} │ day {:>2} │ matched '{}'",
            truncate(&sub.display_name, 24),
            format!("${:.2}", sub.amount),
            sub.day_of_month,
            sub.keyword
        );
    }

    Ok(out)
}

pub fn cmd_cost(config: &ForecastConfig, data: &Path, merchant: &str) -> Result<()> {
    println!("{}", cost_report(config, data, merchant)?);
    Ok(())
}

/// One-line average charge for a merchant
pub fn cost_report(config: &ForecastConfig, data: &Path, merchant: &str) -> Result<String> {
    let household = open_household(data)?;
    let forecaster = Forecaster::new(config.clone()).context("Invalid forecast configuration")?;
    let detector = forecaster.detector();

    let name = detector.normalizer().normalize(merchant);
    let cost = detector.average_cost(&household.transactions, merchant);

    if cost == 0.0 {
        Ok(format!("No charges found for {}", name))
    } else {
        Ok(format!("{}: ${:.2} average per charge", name, cost))
    }
}

pub fn cmd_normalize(config: &ForecastConfig, names: &[String]) -> Result<()> {
    println!("{}", normalize_report(config, names)?);
    Ok(())
}

/// One `raw → normalized` line per descriptor
pub fn normalize_report(config: &ForecastConfig, names: &[String]) -> Result<String> {
    let normalizer = MerchantNormalizer::new(config).context("Invalid normalizer patterns")?;

    Ok(names
        .iter()
        .map(|raw| format!("{:32} → {}", raw, normalizer.normalize(raw)))
        .collect::<Vec<_>>()
        .join("\n"))
}
