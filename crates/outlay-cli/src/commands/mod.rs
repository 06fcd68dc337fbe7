//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `common` - Shared utilities (config, snapshot and date loading)
//! - `forecast` - Upcoming payment forecast
//! - `subscriptions` - Subscription listing, cost lookup and name normalization

pub mod common;
pub mod forecast;
pub mod subscriptions;

// Re-export command functions for main.rs
pub use common::*;
pub use forecast::*;
pub use subscriptions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
