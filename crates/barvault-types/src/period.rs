//! Sampling period definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Spacing between consecutive bars, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SamplingPeriod(u32);

impl SamplingPeriod {
    /// One-minute bars.
    pub const MINUTE: Self = Self(60);

    /// Creates a period from a number of seconds.
    ///
    /// Returns `None` for a zero period.
    #[must_use]
    pub const fn from_seconds(seconds: u32) -> Option<Self> {
        if seconds == 0 { None } else { Some(Self(seconds)) }
    }

    /// Returns the period in seconds.
    #[must_use]
    pub const fn seconds(&self) -> u32 {
        self.0
    }

    /// Returns the Alpha Vantage `interval` parameter for this period.
    ///
    /// Only 1, 5, 15, 30 and 60 minute series exist upstream.
    #[must_use]
    pub const fn alpha_vantage_interval(&self) -> Option<&'static str> {
        match self.0 {
            60 => Some("1min"),
            300 => Some("5min"),
            900 => Some("15min"),
            1800 => Some("30min"),
            3600 => Some("60min"),
            _ => None,
        }
    }
}

impl Default for SamplingPeriod {
    fn default() -> Self {
        Self::MINUTE
    }
}

impl std::fmt::Display for SamplingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl FromStr for SamplingPeriod {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let seconds = match lower.as_str() {
            "m1" | "1m" | "1min" | "minute" => Some(60),
            "m5" | "5m" | "5min" => Some(300),
            "m15" | "15m" | "15min" => Some(900),
            "m30" | "30m" | "30min" => Some(1800),
            "h1" | "1h" | "60min" | "hour" => Some(3600),
            other => other.strip_suffix('s').unwrap_or(other).parse::<u32>().ok(),
        };

        seconds
            .and_then(Self::from_seconds)
            .ok_or_else(|| PeriodParseError(s.to_string()))
    }
}

/// Error returned when parsing an invalid sampling period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodParseError(String);

impl std::fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid sampling period '{}', expected seconds (e.g. 60) or one of: m1, m5, m15, m30, h1",
            self.0
        )
    }
}

impl std::error::Error for PeriodParseError {}
