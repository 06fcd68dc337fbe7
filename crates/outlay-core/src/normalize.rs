//! Merchant name normalization
//!
//! Bank descriptors for the same merchant vary wildly: `PAYPAL *SPOTIFY`,
//! `Spotify PTY LTD`, `SQ *SPOTIFY*REF 8812`. The normalizer canonicalizes
//! them into one display name, and its lower-cased form is the only identity
//! used to group transactions. Detection and cost lookups must go through the
//! same normalizer, otherwise a lookup for "Spotify" misses "Spotify PTY LTD".

use regex::{Regex, RegexBuilder};

use crate::config::ForecastConfig;
use crate::error::Result;

/// Name used for empty or missing descriptors
pub const UNKNOWN_MERCHANT: &str = "Unknown";

/// Canonicalizes raw transaction descriptors
#[derive(Debug, Clone)]
pub struct MerchantNormalizer {
    prefixes: Vec<Regex>,
    suffixes: Option<Regex>,
}

impl MerchantNormalizer {
    /// Build a normalizer from the configured prefix and suffix lists
    pub fn new(config: &ForecastConfig) -> Result<Self> {
        Self::with_patterns(&config.processor_prefixes, &config.legal_suffixes)
    }

    pub fn with_patterns(prefixes: &[String], legal_suffixes: &[String]) -> Result<Self> {
        let prefixes = prefixes
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| {
                RegexBuilder::new(&format!(r"^(?:{})(?:\s+|\b|$)", p.trim()))
                    .case_insensitive(true)
                    .build()
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let alternatives: Vec<String> = legal_suffixes
            .iter()
            .map(|s| {
                s.split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\.?\s+")
            })
            .filter(|s| !s.is_empty())
            .collect();

        let suffixes = if alternatives.is_empty() {
            None
        } else {
            Some(
                RegexBuilder::new(&format!(r"(?:^|\s)(?:{})\.?\s*$", alternatives.join("|")))
                    .case_insensitive(true)
                    .build()?,
            )
        };

        Ok(Self { prefixes, suffixes })
    }

    /// Canonical display form of a descriptor
    ///
    /// Deterministic and idempotent. Never returns an empty string: when
    /// cleanup removes everything, the trimmed input is returned unchanged.
    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return UNKNOWN_MERCHANT.to_string();
        }

        let mut current = trimmed.to_lowercase();
        loop {
            let next = self.clean_pass(&current);
            if next == current {
                break;
            }
            current = next;
        }

        if current.is_empty() {
            return trimmed.to_string();
        }

        title_case(&current)
    }

    /// Grouping identity for a descriptor (lower-cased normalized form)
    pub fn key(&self, raw: &str) -> String {
        self.normalize(raw).to_lowercase()
    }

    /// One round of prefix, reference, suffix and punctuation stripping
    fn clean_pass(&self, input: &str) -> String {
        let mut s = input.trim().to_string();

        while let Some(m) = self
            .prefixes
            .iter()
            .find_map(|re| re.find(&s).filter(|m| !m.is_empty()))
        {
            s = s[m.end()..].trim_start().to_string();
        }

        if let Some(star) = s.find('*') {
            s.truncate(star);
        }

        if let Some(re) = &self.suffixes {
            s = re.replace(s.trim_end(), "").into_owned();
        }

        s.chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Upper-case the first letter of each word
///
/// A letter is only changed when its upper-case form is a single character
/// that lower-cases back to it (`ß` stays `ß`), so the result lower-cases to
/// the input again.
fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let mut upper = first.to_uppercase();
                    let capital = match (upper.next(), upper.next()) {
                        (Some(u), None) if round_trips(u, first) => u,
                        _ => first,
                    };
                    std::iter::once(capital).chain(chars).collect()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn round_trips(upper: char, lower: char) -> bool {
    let mut back = upper.to_lowercase();
    back.next() == Some(lower) && back.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> MerchantNormalizer {
        MerchantNormalizer::new(&ForecastConfig::default()).unwrap()
    }

    #[test]
    fn test_normalize_basic() {
        let n = normalizer();
        assert_eq!(n.normalize("  NETFLIX  "), "Netflix");
        assert_eq!(n.normalize("netflix.com"), "Netflix Com");
        assert_eq!(n.normalize("Woolworths Metro 1234"), "Woolworths Metro 1234");
    }

    #[test]
    fn test_processor_prefixes_stripped() {
        let n = normalizer();
        assert_eq!(n.normalize("PAYPAL *SPOTIFY"), "Spotify");
        assert_eq!(n.normalize("PayPal Spotify"), "Spotify");
        assert_eq!(n.normalize("SQ *BLUE BOTTLE COFFEE"), "Blue Bottle Coffee");
        assert_eq!(n.normalize("SP * ALLBIRDS"), "Allbirds");
        assert_eq!(n.normalize("APPLE.COM/BILL ICLOUD"), "Icloud");
        assert_eq!(n.normalize("DD 123456 NETFLIX"), "Netflix");
        assert_eq!(n.normalize("Direct Debit Origin Energy"), "Origin Energy");
        // Prefix must end on a word boundary
        assert_eq!(n.normalize("paypalooza"), "Paypalooza");
    }

    #[test]
    fn test_reference_suffix_stripped() {
        let n = normalizer();
        assert_eq!(n.normalize("NETFLIX.COM*12345"), "Netflix Com");
        assert_eq!(n.normalize("PAYPAL *SPOTIFY*REF 8812"), "Spotify");
    }

    #[test]
    fn test_legal_suffixes_stripped() {
        let n = normalizer();
        assert_eq!(n.normalize("Spotify PTY LTD"), "Spotify");
        assert_eq!(n.normalize("Spotify Pty. Ltd."), "Spotify");
        assert_eq!(n.normalize("Acme Ltd"), "Acme");
        assert_eq!(n.normalize("Acme Ltd."), "Acme");
        // Only whole trailing words
        assert_eq!(n.normalize("Coltd Fitness"), "Coltd Fitness");
    }

    #[test]
    fn test_spotify_variants_share_key() {
        let n = normalizer();
        assert_eq!(n.normalize("Spotify PTY LTD"), n.normalize("Spotify"));
        assert_eq!(n.key("PAYPAL *SPOTIFY"), "spotify");
        assert_eq!(n.key("spotify pty ltd"), n.key("SPOTIFY"));
    }

    #[test]
    fn test_empty_and_missing_names() {
        let n = normalizer();
        assert_eq!(n.normalize(""), UNKNOWN_MERCHANT);
        assert_eq!(n.normalize("   "), UNKNOWN_MERCHANT);
        // Collapses to nothing: fall back to the raw string
        assert_eq!(n.normalize(" *** "), "***");
        assert_eq!(n.normalize("PayPal *"), "PayPal *");
        assert_eq!(n.normalize("LTD"), "LTD");
    }

    #[test]
    fn test_normalize_idempotent() {
        let n = normalizer();
        let samples = [
            "PAYPAL *SPOTIFY",
            "Spotify PTY LTD",
            "dd-12 gym",
            "x ltd-ltd",
            "NETFLIX.COM*12345",
            "Café Olé — Sydney",
            "***",
            "",
            "Direct Debit",
            "sq *sq *coffee",
            "ßtudio gym",
            "ſpa day",
        ];
        for raw in samples {
            let once = n.normalize(raw);
            assert_eq!(n.normalize(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_multi_char_capitals_left_alone() {
        let n = normalizer();
        assert_eq!(n.normalize("ßtudio gym"), "ßtudio Gym");
        assert_eq!(n.normalize("STRASSE ßAUNA"), "Strasse ßauna");
        assert_eq!(n.normalize("ſpa day"), "ſpa Day");
    }

    #[test]
    fn test_punctuation_cannot_expose_prefix() {
        let n = normalizer();
        // "dd-12" only becomes a prefix after punctuation is replaced
        assert_eq!(n.normalize("dd-12 gym"), "Gym");
        assert_eq!(n.normalize("x ltd-ltd"), "X");
    }

    #[test]
    fn test_custom_patterns() {
        let n = MerchantNormalizer::with_patterns(&["pos".to_string()], &["inc".to_string()])
            .unwrap();
        assert_eq!(n.normalize("POS Hulu Inc"), "Hulu");
        assert_eq!(n.normalize("Spotify PTY LTD"), "Spotify Pty Ltd");
    }

    #[test]
    fn test_invalid_prefix_pattern() {
        let result = MerchantNormalizer::with_patterns(&["(unclosed".to_string()], &[]);
        assert!(matches!(result, Err(crate::error::Error::Regex(_))));
    }
}
