//! Subscription detection
//!
//! Infers recurring subscription charges from raw transaction history using
//! keyword stems (streaming, music, fitness brands...). Matching transactions
//! are grouped by normalized merchant key; the first dated match for a key
//! supplies the amount and day of month. No averaging, no scoring.

use chrono::Datelike;
use std::collections::HashSet;
use tracing::debug;

use crate::config::ForecastConfig;
use crate::error::Result;
use crate::models::{DetectedSubscription, Transaction};
use crate::normalize::MerchantNormalizer;

/// Keyword-based subscription detector
#[derive(Debug, Clone)]
pub struct SubscriptionDetector {
    normalizer: MerchantNormalizer,
    /// Lower-cased keyword stems in priority order
    keywords: Vec<String>,
}

impl SubscriptionDetector {
    pub fn new(config: &ForecastConfig) -> Result<Self> {
        Ok(Self::with_normalizer(
            MerchantNormalizer::new(config)?,
            &config.subscription_keywords,
        ))
    }

    pub fn with_normalizer(normalizer: MerchantNormalizer, keywords: &[String]) -> Self {
        let keywords = keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self {
            normalizer,
            keywords,
        }
    }

    /// The normalizer used for grouping; lookups must use the same one
    pub fn normalizer(&self) -> &MerchantNormalizer {
        &self.normalizer
    }

    /// First keyword (in configured order) contained in the descriptor
    pub fn matched_keyword(&self, descriptor: &str) -> Option<&str> {
        let lower = descriptor.to_lowercase();
        self.keywords
            .iter()
            .find(|keyword| lower.contains(keyword.as_str()))
            .map(|keyword| keyword.as_str())
    }

    /// Detect subscriptions in a transaction history
    ///
    /// Returns at most one entry per normalized key, in the order keys were
    /// first seen. Undated matches cannot supply a day of month and are
    /// skipped without claiming their key.
    pub fn detect_subscriptions(&self, transactions: &[Transaction]) -> Vec<DetectedSubscription> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut detected: Vec<DetectedSubscription> = Vec::new();

        for tx in transactions {
            let Some(descriptor) = tx.descriptor() else {
                continue;
            };
            let Some(keyword) = self.matched_keyword(descriptor) else {
                continue;
            };
            let Some(date) = tx.date else {
                debug!("Skipping undated subscription charge: {}", descriptor);
                continue;
            };

            let display_name = self.normalizer.normalize(descriptor);
            let key = display_name.to_lowercase();
            if !seen.insert(key.clone()) {
                continue;
            }

            debug!(
                "Detected subscription: {} (keyword '{}') @ ${:.2} on day {}",
                display_name,
                keyword,
                tx.amount.abs(),
                date.day()
            );

            detected.push(DetectedSubscription {
                key,
                display_name,
                amount: tx.amount.abs(),
                day_of_month: date.day(),
                keyword: keyword.to_string(),
            });
        }

        detected
    }

    /// Average charge for a merchant across keyword-matched transactions
    ///
    /// `merchant` goes through the same normalizer as detection, so
    /// "Spotify" finds "Spotify PTY LTD" charges. No match is 0.0.
    pub fn average_cost(&self, transactions: &[Transaction], merchant: &str) -> f64 {
        let key = self.normalizer.key(merchant);

        let amounts: Vec<f64> = transactions
            .iter()
            .filter_map(|tx| {
                let descriptor = tx.descriptor()?;
                self.matched_keyword(descriptor)?;
                (self.normalizer.key(descriptor) == key).then(|| tx.amount.abs())
            })
            .collect();

        if amounts.is_empty() {
            debug!("No charges found for merchant key '{}'", key);
            return 0.0;
        }

        amounts.iter().sum::<f64>() / amounts.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn detector() -> SubscriptionDetector {
        SubscriptionDetector::new(&ForecastConfig::default()).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_history() {
        assert!(detector().detect_subscriptions(&[]).is_empty());
    }

    #[test]
    fn test_detects_keyword_matches() {
        let txs = vec![
            Transaction::new("NETFLIX.COM", -15.99).with_date(date(2026, 8, 25)),
            Transaction::new("Woolworths 1234", -84.10).with_date(date(2026, 8, 26)),
            Transaction::new("PAYPAL *SPOTIFY", -12.99).with_date(date(2026, 8, 3)),
        ];

        let subs = detector().detect_subscriptions(&txs);
        assert_eq!(subs.len(), 2);

        assert_eq!(subs[0].key, "netflix com");
        assert_eq!(subs[0].display_name, "Netflix Com");
        assert_eq!(subs[0].amount, 15.99);
        assert_eq!(subs[0].day_of_month, 25);
        assert_eq!(subs[0].keyword, "netflix");

        assert_eq!(subs[1].display_name, "Spotify");
        assert_eq!(subs[1].day_of_month, 3);
    }

    #[test]
    fn test_first_match_wins() {
        let txs = vec![
            Transaction::new("Spotify", -11.99).with_date(date(2026, 6, 3)),
            Transaction::new("SPOTIFY PTY LTD", -12.99).with_date(date(2026, 7, 5)),
            Transaction::new("paypal *spotify", -13.99).with_date(date(2026, 8, 7)),
        ];

        let subs = detector().detect_subscriptions(&txs);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].amount, 11.99);
        assert_eq!(subs[0].day_of_month, 3);
    }

    #[test]
    fn test_undated_match_does_not_claim_key() {
        let txs = vec![
            Transaction::new("Spotify PTY LTD", -12.0),
            Transaction::new("Spotify", -12.99).with_date(date(2026, 8, 9)),
        ];

        let subs = detector().detect_subscriptions(&txs);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].amount, 12.99);
        assert_eq!(subs[0].day_of_month, 9);

        let only_undated = vec![Transaction::new("Spotify PTY LTD", -12.0)];
        assert!(detector().detect_subscriptions(&only_undated).is_empty());
    }

    #[test]
    fn test_descriptor_falls_back_to_merchant_and_item() {
        let txs = vec![
            Transaction {
                merchant: Some("Disney Plus".to_string()),
                amount: -13.99,
                date: Some(date(2026, 8, 12)),
                ..Default::default()
            },
            Transaction {
                description: Some("".to_string()),
                item: Some("Anytime Fitness membership".to_string()),
                amount: -19.95,
                date: Some(date(2026, 8, 1)),
                ..Default::default()
            },
        ];

        let subs = detector().detect_subscriptions(&txs);
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].display_name, "Disney Plus");
        assert_eq!(subs[1].display_name, "Anytime Fitness Membership");
        assert_eq!(subs[1].keyword, "fitness");
    }

    #[test]
    fn test_first_keyword_in_list_order() {
        let d = detector();
        // "netflix" precedes "youtube" in the keyword list
        assert_eq!(d.matched_keyword("YouTube via Netflix bundle"), Some("netflix"));
        assert_eq!(d.matched_keyword("SPOTIFY"), Some("spotify"));
        assert_eq!(d.matched_keyword("Coles Supermarket"), None);
    }

    #[test]
    fn test_custom_keywords() {
        let config = ForecastConfig {
            subscription_keywords: vec![" Crunchyroll ".to_string(), String::new()],
            ..Default::default()
        };
        let d = SubscriptionDetector::new(&config).unwrap();
        let txs = vec![
            Transaction::new("CRUNCHYROLL*4412", -7.99).with_date(date(2026, 8, 14)),
            Transaction::new("Netflix", -15.99).with_date(date(2026, 8, 25)),
        ];

        let subs = d.detect_subscriptions(&txs);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].display_name, "Crunchyroll");
    }

    #[test]
    fn test_average_cost_uses_normalized_key() {
        let txs = vec![
            Transaction::new("Spotify PTY LTD", -12.0),
            Transaction::new("PAYPAL *SPOTIFY", -14.0).with_date(date(2026, 8, 3)),
            Transaction::new("Netflix", -15.99).with_date(date(2026, 8, 25)),
        ];
        let d = detector();

        assert_eq!(d.average_cost(&txs, "Spotify"), 13.0);
        assert_eq!(d.average_cost(&txs, "spotify pty ltd"), 13.0);
        assert_eq!(d.average_cost(&txs, "Hulu"), 0.0);
        assert_eq!(d.average_cost(&[], "Spotify"), 0.0);
    }

    #[test]
    fn test_average_cost_ignores_unmatched_transactions() {
        // Same normalized key but no subscription keyword
        let txs = vec![Transaction::new("Acme Ltd", -50.0)];
        assert_eq!(detector().average_cost(&txs, "Acme"), 0.0);
    }
}
