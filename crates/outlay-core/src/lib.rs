//! Outlay Core Library
//!
//! Upcoming-payment forecasting for a household:
//! - Merchant normalization of noisy transaction descriptors
//! - Keyword-based subscription detection from transaction history
//! - Due-date projection with month rollover
//! - Forecast aggregation into a ranked, urgency-tagged list
//!
//! Everything in the forecasting path is pure: the reference date is always
//! passed in, nothing reads a clock, and no input causes an error.

pub mod config;
pub mod detect;
pub mod error;
pub mod forecast;
pub mod household;
pub mod models;
pub mod normalize;
pub mod schedule;

pub use config::{DueDayRule, ForecastConfig};
pub use detect::SubscriptionDetector;
pub use error::{Error, Result};
pub use forecast::Forecaster;
pub use household::Household;
pub use models::{
    Debt, DetectedSubscription, Forecast, ForecastEntry, RecurringExpense, SourceType,
    Transaction, Urgency,
};
pub use normalize::MerchantNormalizer;
pub use schedule::{days_until, next_due_date};
