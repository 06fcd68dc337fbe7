//! Upcoming payment forecast
//!
//! Merges fixed recurring expenses, debt repayments and detected
//! subscriptions into one list of payments due within the lookahead window,
//! tagged by urgency and ranked by days until due.
//!
//! The reference date is always supplied by the caller. Two calls with the
//! same inputs produce the same forecast.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::ForecastConfig;
use crate::detect::SubscriptionDetector;
use crate::error::Result;
use crate::models::{
    Debt, Forecast, ForecastEntry, RecurringExpense, SourceType, Transaction, Urgency,
};
use crate::schedule::days_until;

/// Category label for debt entries
pub const DEBT_CATEGORY: &str = "Debt";
/// Category label for detected subscription entries
pub const SUBSCRIPTION_CATEGORY: &str = "Subscription";

/// Builds forecasts from household data
#[derive(Debug, Clone)]
pub struct Forecaster {
    config: ForecastConfig,
    detector: SubscriptionDetector,
}

impl Forecaster {
    pub fn new(config: ForecastConfig) -> Result<Self> {
        let detector = SubscriptionDetector::new(&config)?;
        Ok(Self { config, detector })
    }

    /// Override the lookahead window
    pub fn with_window_days(mut self, days: u32) -> Self {
        self.config.window_days = days;
        self
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn detector(&self) -> &SubscriptionDetector {
        &self.detector
    }

    /// Urgency tier for an entry due in `days` days
    pub fn urgency_for(&self, days: u32) -> Urgency {
        if days <= self.config.high_within {
            Urgency::High
        } else if days <= self.config.medium_within {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }

    /// Forecast payments due within the window starting at `reference`
    pub fn forecast(
        &self,
        recurring: &[RecurringExpense],
        debts: &[Debt],
        transactions: &[Transaction],
        reference: NaiveDate,
    ) -> Forecast {
        let window = self.config.window_days;
        let mut entries: Vec<ForecastEntry> = Vec::new();

        // 1. Fixed recurring expenses
        for expense in recurring.iter().filter(|e| e.active) {
            let due_day = self
                .config
                .due_day_for(&expense.category, &expense.description);
            self.push_if_due(
                &mut entries,
                reference,
                due_day,
                Pending {
                    name: &expense.description,
                    amount: expense.amount,
                    category: &expense.category,
                    source_type: SourceType::Recurring,
                },
            );
        }

        // 2. Debt repayments
        for debt in debts {
            self.push_if_due(
                &mut entries,
                reference,
                self.config.debt_due_day,
                Pending {
                    name: &debt.name,
                    amount: debt.monthly_repayment,
                    category: DEBT_CATEGORY,
                    source_type: SourceType::Debt,
                },
            );
        }

        // 3. Subscriptions inferred from history
        for sub in self.detector.detect_subscriptions(transactions) {
            self.push_if_due(
                &mut entries,
                reference,
                sub.day_of_month,
                Pending {
                    name: &sub.display_name,
                    amount: sub.amount,
                    category: SUBSCRIPTION_CATEGORY,
                    source_type: SourceType::Subscription,
                },
            );
        }

        // Stable: equal days keep recurring -> debt -> subscription order
        entries.sort_by_key(|entry| entry.days_until);

        let total: f64 = entries.iter().map(|entry| entry.amount).sum();

        info!(
            "Forecast from {}: {} payments due within {} days, total ${:.2}",
            reference,
            entries.len(),
            window,
            total
        );

        Forecast { entries, total }
    }

    fn push_if_due(
        &self,
        entries: &mut Vec<ForecastEntry>,
        reference: NaiveDate,
        due_day: u32,
        pending: Pending<'_>,
    ) {
        let days = days_until(reference, due_day);
        if days > self.config.window_days {
            debug!(
                "{} ({}) due in {} days, outside {}-day window",
                pending.name, pending.source_type, days, self.config.window_days
            );
            return;
        }

        entries.push(ForecastEntry {
            name: pending.name.to_string(),
            amount: pending.amount.abs(),
            days_until: days,
            category: pending.category.to_string(),
            source_type: pending.source_type,
            urgency: self.urgency_for(days),
        });
    }
}

/// An obligation before its due date is projected
struct Pending<'a> {
    name: &'a str,
    amount: f64,
    category: &'a str,
    source_type: SourceType,
}
