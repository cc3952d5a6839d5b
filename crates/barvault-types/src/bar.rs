//! Intraday OHLCV bars and tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single sampled bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Bar timestamp (UTC).
    pub timestamp: DateTime<Utc>,
    /// Opening price.
    pub open: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume.
    pub volume: f64,
}

impl PriceBar {
    /// Creates a new bar.
    #[must_use]
    pub const fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Creates a bar where open, high, low and close share one price.
    #[must_use]
    pub const fn flat(timestamp: DateTime<Utc>, price: f64, volume: f64) -> Self {
        Self::new(timestamp, price, price, price, price, volume)
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// Ordered sequence of bars returned by one provider call.
///
/// Rows keep the order the provider produced them in. Neither uniqueness nor
/// monotonicity of timestamps is enforced, and an empty table is a valid
/// result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    bars: Vec<PriceBar>,
}

impl PriceTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self { bars: Vec::new() }
    }

    /// Appends a bar.
    pub fn push(&mut self, bar: PriceBar) {
        self.bars.push(bar);
    }

    /// Returns the bars as a slice.
    #[must_use]
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// Returns an iterator over the bars.
    pub fn iter(&self) -> std::slice::Iter<'_, PriceBar> {
        self.bars.iter()
    }

    /// Returns the number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns true if the table has no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Returns the first and last timestamps, if any.
    #[must_use]
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp)),
            _ => None,
        }
    }
}

impl From<Vec<PriceBar>> for PriceTable {
    fn from(bars: Vec<PriceBar>) -> Self {
        Self { bars }
    }
}

impl FromIterator<PriceBar> for PriceTable {
    fn from_iter<I: IntoIterator<Item = PriceBar>>(iter: I) -> Self {
        Self {
            bars: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PriceTable {
    type Item = &'a PriceBar;
    type IntoIter = std::slice::Iter<'a, PriceBar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}
