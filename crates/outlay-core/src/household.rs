//! Household snapshot
//!
//! The persistence layer stores each household as one JSON blob. This module
//! decodes that blob into the records the forecaster consumes. Unknown fields
//! are ignored. Missing or null collections are empty, and collection elements
//! that are not objects are skipped.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::forecast::Forecaster;
use crate::models::{Debt, Forecast, RecurringExpense, Transaction};

/// One household's data as stored by the persistence API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub household_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub transactions: Vec<Transaction>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub recurring_expenses: Vec<RecurringExpense>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub debts: Vec<Debt>,
}

impl Household {
    /// Decode a snapshot from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        let household: Self = serde_json::from_str(content)?;
        Ok(household)
    }

    /// Read a snapshot file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Forecast this household's upcoming payments
    pub fn forecast(&self, forecaster: &Forecaster, reference: NaiveDate) -> Forecast {
        forecaster.forecast(
            &self.recurring_expenses,
            &self.debts,
            &self.transactions,
            reference,
        )
    }
}

/// Decode a collection, treating null or non-array values as empty and
/// skipping elements that are not objects or fail to decode
fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("Skipping undecodable record: {}", e);
                None
            }
        })
        .collect())
}
