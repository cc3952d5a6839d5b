//! Lookback window for intraday queries.

use serde::{Deserialize, Serialize};

/// Number of calendar days of history requested from a provider.
///
/// Providers may silently serve less than requested; the scrape endpoint
/// caps intraday history at roughly fifteen days regardless of the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookbackWindow {
    days: u32,
}

impl LookbackWindow {
    /// Default lookback, in days.
    pub const DEFAULT_DAYS: u32 = 20;

    /// Creates a lookback window. Returns `None` for zero days.
    #[must_use]
    pub const fn days(days: u32) -> Option<Self> {
        if days == 0 { None } else { Some(Self { days }) }
    }

    /// Returns the number of days.
    #[must_use]
    pub const fn as_days(&self) -> u32 {
        self.days
    }

    /// Returns the window in the `<n>d` form used by query strings.
    #[must_use]
    pub fn as_query(&self) -> String {
        format!("{}d", self.days)
    }
}

impl Default for LookbackWindow {
    fn default() -> Self {
        Self {
            days: Self::DEFAULT_DAYS,
        }
    }
}

impl std::fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} days", self.days)
    }
}
