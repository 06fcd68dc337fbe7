//! Forecast command implementation

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use outlay_core::{Forecast, ForecastConfig, Forecaster, SourceType, Urgency};

use super::{open_household, resolve_today, truncate};

pub fn cmd_forecast(
    config: &ForecastConfig,
    data: &Path,
    today: Option<&str>,
    window: Option<u32>,
    source: Option<&str>,
    json: bool,
) -> Result<()> {
    let report = forecast_report(config, data, today, window, source, json)?;
    println!("{}", report);
    Ok(())
}

/// Build the forecast output (table or JSON) without printing it
pub fn forecast_report(
    config: &ForecastConfig,
    data: &Path,
    today: Option<&str>,
    window: Option<u32>,
    source: Option<&str>,
    json: bool,
) -> Result<String> {
    if window == Some(0) {
        anyhow::bail!("--window must be at least 1 day");
    }
    let source = source
        .map(|s| s.trim().to_lowercase().parse::<SourceType>())
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let reference = resolve_today(today)?;
    let household = open_household(data)?;

    let mut forecaster =
        Forecaster::new(config.clone()).context("Invalid forecast configuration")?;
    if let Some(days) = window {
        forecaster = forecaster.with_window_days(days);
    }
    let window_days = forecaster.config().window_days;

    let mut forecast = household.forecast(&forecaster, reference);
    if let Some(source) = source {
        forecast = only_source(forecast, source);
    }

    if json {
        return Ok(serde_json::to_string_pretty(&forecast)?);
    }

    Ok(render_forecast(&forecast, reference, window_days))
}

/// Keep the entries of one source; the total covers what is kept
fn only_source(forecast: Forecast, source: SourceType) -> Forecast {
    let entries: Vec<_> = forecast
        .entries
        .into_iter()
        .filter(|entry| entry.source_type == source)
        .collect();
    let total: f64 = entries.iter().map(|entry| entry.amount).sum();
    Forecast { entries, total }
}

pub fn render_forecast(forecast: &Forecast, reference: NaiveDate, window_days: u32) -> String {
    let mut out = String::new();
    let rule = "   ─────────────────────────────────────────────────────────────";

    let _ = writeln!(out);
    let _ = writeln!(out, "📅 Upcoming Payments");
    let _ = writeln!(out, "   From {} · next {} days", reference, window_days);
    let _ = writeln!(out, "{}", rule);

    if forecast.is_empty() {
        let _ = write!(out, "   No upcoming payments.");
        return out;
    }

    for entry in &forecast.entries {
        let urgency_icon = match entry.urgency {
            Urgency::High => "🔴",
            Urgency::Medium => "🟡",
            Urgency::Low => "🟢",
        };
        let _ = writeln!(
            out,
            "   {} {:24} │ {:>10} │ {:12} │ {}",
            urgency_icon,
            truncate(&entry.name, 24),
            format!("${:.2}", entry.amount),
            truncate(&entry.category, 12),
            due_label(entry.days_until)
        );
    }

    let _ = writeln!(out, "{}", rule);
    let _ = write!(out, "   Total: ${:.2}", forecast.total);
    out
}

/// Human label for days until due
pub fn due_label(days: u32) -> String {
    match days {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        n => format!("in {} days", n),
    }
}
