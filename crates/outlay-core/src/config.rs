//! Forecast heuristics configuration
//!
//! The due-day table, subscription keywords, processor prefixes and urgency
//! thresholds are data, not control flow. New categories or keywords are
//! added by editing a TOML file.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a layered resolution:
//! 1. Explicit path passed by the caller (if it exists)
//! 2. Override in data dir (~/.local/share/outlay/config/forecast.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Keys missing from a file fall back to the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/forecast.toml");

/// Maps a recurring expense to an estimated due day.
///
/// A rule matches when `category` equals the expense category, or
/// `description_contains` is found in the expense description. Both tests
/// ignore case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DueDayRule {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description_contains: Option<String>,
    pub day: u32,
}

impl DueDayRule {
    pub fn for_category(category: impl Into<String>, day: u32) -> Self {
        Self {
            category: Some(category.into()),
            description_contains: None,
            day,
        }
    }

    pub fn for_description(fragment: impl Into<String>, day: u32) -> Self {
        Self {
            category: None,
            description_contains: Some(fragment.into()),
            day,
        }
    }

    pub fn matches(&self, category: &str, description: &str) -> bool {
        let category_match = self
            .category
            .as_deref()
            .is_some_and(|c| c.trim().to_lowercase() == category.trim().to_lowercase());
        let description_match = self
            .description_contains
            .as_deref()
            .filter(|fragment| !fragment.is_empty())
            .is_some_and(|fragment| {
                description
                    .to_lowercase()
                    .contains(&fragment.to_lowercase())
            });
        category_match || description_match
    }
}

/// Forecast configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Lookahead window in days, inclusive
    pub window_days: u32,
    /// Due day for recurring expenses no rule matches
    pub default_due_day: u32,
    /// Due day assumed for debt repayments
    pub debt_due_day: u32,
    /// Entries due within this many days are high urgency
    pub high_within: u32,
    /// Entries due within this many days are medium urgency
    pub medium_within: u32,
    /// Estimated due days for recurring expenses, first match wins
    pub due_day_rules: Vec<DueDayRule>,
    /// Regex fragments stripped from the start of descriptors
    pub processor_prefixes: Vec<String>,
    /// Legal-entity suffixes stripped from the end of descriptors
    pub legal_suffixes: Vec<String>,
    /// Substring stems marking a subscription charge, in priority order
    pub subscription_keywords: Vec<String>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window_days: 14,
            default_due_day: 15,
            debt_due_day: 15,
            high_within: 3,
            medium_within: 7,
            due_day_rules: vec![
                DueDayRule::for_category("Housing", 1),
                DueDayRule::for_description("rent", 1),
                DueDayRule::for_category("Utilities", 20),
            ],
            processor_prefixes: [
                r"paypal\s*\*?",
                r"sq\s*\*",
                r"sp\s*\*",
                r"apple\.com/bill",
                r"itunes\.com",
                r"google\s*\*",
                r"dd\s*\d+",
                r"direct\s+debit",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            legal_suffixes: vec!["pty ltd".to_string(), "ltd".to_string()],
            subscription_keywords: [
                "netflix",
                "spotify",
                "disney",
                "stan",
                "binge",
                "kayo",
                "youtube",
                "apple music",
                "prime video",
                "amazon prime",
                "hulu",
                "hbo",
                "paramount",
                "audible",
                "patreon",
                "peloton",
                "strava",
                "headspace",
                "gym",
                "fitness",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl ForecastConfig {
    /// Load configuration using the layered resolution
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let content = if let Some(path) = override_path.filter(|p| p.exists()) {
            debug!("Loading forecast config from {}", path.display());
            read_config(path)?
        } else if let Some(default_path) = default_config_path().filter(|p| p.exists()) {
            debug!("Loading forecast config from {}", default_path.display());
            read_config(&default_path)?
        } else {
            DEFAULT_CONFIG.to_string()
        };

        Self::from_toml(&content)
    }

    /// The configuration compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    /// Parse config from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();

        if let Some(forecast) = raw.forecast {
            if let Some(days) = forecast.window_days {
                config.window_days = days;
            }
            if let Some(day) = forecast.default_due_day {
                config.default_due_day = day;
            }
            if let Some(day) = forecast.debt_due_day {
                config.debt_due_day = day;
            }
        }

        if let Some(urgency) = raw.urgency {
            if let Some(days) = urgency.high_within {
                config.high_within = days;
            }
            if let Some(days) = urgency.medium_within {
                config.medium_within = days;
            }
        }

        if let Some(rules) = raw.due_day_rules {
            config.due_day_rules = rules;
        }

        if let Some(normalizer) = raw.normalizer {
            if let Some(prefixes) = normalizer.processor_prefixes {
                config.processor_prefixes = prefixes;
            }
            if let Some(suffixes) = normalizer.legal_suffixes {
                config.legal_suffixes = suffixes;
            }
        }

        if let Some(detection) = raw.detection {
            if let Some(keywords) = detection.subscription_keywords {
                config.subscription_keywords = keywords;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.window_days == 0 {
            return Err(Error::Config("window_days must be at least 1".to_string()));
        }
        if self.high_within > self.medium_within {
            return Err(Error::Config(format!(
                "urgency.high_within ({}) must not exceed urgency.medium_within ({})",
                self.high_within, self.medium_within
            )));
        }
        for (name, day) in [
            ("default_due_day", self.default_due_day),
            ("debt_due_day", self.debt_due_day),
        ] {
            if !(1..=31).contains(&day) {
                return Err(Error::Config(format!(
                    "{} must be between 1 and 31, got {}",
                    name, day
                )));
            }
        }
        for rule in &self.due_day_rules {
            if !(1..=31).contains(&rule.day) {
                return Err(Error::Config(format!(
                    "due day rule day must be between 1 and 31, got {}",
                    rule.day
                )));
            }
            if rule.category.is_none() && rule.description_contains.is_none() {
                return Err(Error::Config(
                    "due day rule needs a category or description_contains".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Estimated due day for a recurring expense
    pub fn due_day_for(&self, category: &str, description: &str) -> u32 {
        self.due_day_rules
            .iter()
            .find(|rule| rule.matches(category, description))
            .map(|rule| rule.day)
            .unwrap_or(self.default_due_day)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("outlay").join("config").join("forecast.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    forecast: Option<RawForecast>,
    urgency: Option<RawUrgency>,
    due_day_rules: Option<Vec<DueDayRule>>,
    normalizer: Option<RawNormalizer>,
    detection: Option<RawDetection>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    window_days: Option<u32>,
    default_due_day: Option<u32>,
    debt_due_day: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawUrgency {
    high_within: Option<u32>,
    medium_within: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawNormalizer {
    processor_prefixes: Option<Vec<String>>,
    legal_suffixes: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawDetection {
    subscription_keywords: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = ForecastConfig::embedded().unwrap();
        assert_eq!(config, ForecastConfig::default());
    }

    #[test]
    fn test_due_day_table() {
        let config = ForecastConfig::default();
        assert_eq!(config.due_day_for("Housing", "Mortgage"), 1);
        assert_eq!(config.due_day_for("housing", "Mortgage"), 1);
        assert_eq!(config.due_day_for("Other", "Monthly RENT"), 1);
        assert_eq!(config.due_day_for("Utilities", "Electricity"), 20);
        assert_eq!(config.due_day_for("Insurance", "Car insurance"), 15);
        assert_eq!(config.due_day_for("", ""), 15);
    }

    #[test]
    fn test_category_rule_ignores_non_ascii_case() {
        let rule = DueDayRule::for_category("Électricité", 22);
        assert!(rule.matches("ÉLECTRICITÉ", ""));
        assert!(rule.matches(" électricité ", ""));
        assert!(!rule.matches("Electricite", ""));
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = ForecastConfig::from_toml(
            r#"
            [forecast]
            window_days = 30

            [[due_day_rules]]
            category = "Insurance"
            day = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.window_days, 30);
        assert_eq!(config.debt_due_day, 15);
        assert_eq!(config.high_within, 3);
        assert_eq!(config.due_day_for("Insurance", "Home"), 5);
        // Rule table is replaced wholesale
        assert_eq!(config.due_day_for("Utilities", "Gas"), 15);
        assert!(!config.subscription_keywords.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            ForecastConfig::from_toml("[forecast]\nwindow_days = 0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ForecastConfig::from_toml("[urgency]\nhigh_within = 9\nmedium_within = 7"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ForecastConfig::from_toml("[[due_day_rules]]\nday = 3"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ForecastConfig::from_toml("[[due_day_rules]]\ncategory = \"X\"\nday = 32"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ForecastConfig::from_toml("not = [valid"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[detection]\nsubscription_keywords = [\"crunchyroll\"]").unwrap();

        let config = ForecastConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.subscription_keywords, vec!["crunchyroll".to_string()]);
    }
}
