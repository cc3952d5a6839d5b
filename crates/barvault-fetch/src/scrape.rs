//! Parsing of the scrape endpoint's anchor/offset line format.
//!
//! The body is a sequence of comma-separated lines. Only two shapes carry
//! data:
//!
//! - `a<epoch>,v1,v2,...` is an anchor: its timestamp is the epoch itself and
//!   it becomes the base for following offset records.
//! - `<n>,v1,v2,...` is an offset: its timestamp is
//!   `anchor + period * n` using the most recent anchor.
//!
//! Every other line is metadata and ignored, except `COLUMNS=...`, which
//! names the value columns.

use barvault_types::{PriceBar, PriceTable, SamplingPeriod};
use chrono::DateTime;
use thiserror::Error;

/// Errors that can occur while parsing a scrape body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    /// An offset record appeared before any anchor record.
    #[error("offset record on line {line} precedes any anchor record")]
    MalformedAnchor {
        /// 1-based line number.
        line: usize,
    },

    /// A data record could not be parsed.
    #[error("invalid record on line {line}: {reason}")]
    InvalidRecord {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}

/// Positions of the OHLCV values among the value fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl Default for ColumnMap {
    /// Order requested through the `f=d,o,h,l,c,v` parameter.
    fn default() -> Self {
        Self {
            open: 0,
            high: 1,
            low: 2,
            close: 3,
            volume: Some(4),
        }
    }
}

impl ColumnMap {
    /// Builds a map from a `COLUMNS=` header such as `DATE,CLOSE,HIGH,LOW,OPEN,VOLUME`.
    fn from_header(header: &str) -> Option<Self> {
        // Positions are relative to the value fields, so the date column is skipped.
        let names: Vec<String> = header
            .split(',')
            .map(|name| name.trim().to_uppercase())
            .filter(|name| name != "DATE")
            .collect();
        let find = |wanted: &str| names.iter().position(|name| name == wanted);

        Some(Self {
            open: find("OPEN")?,
            high: find("HIGH")?,
            low: find("LOW")?,
            close: find("CLOSE")?,
            volume: find("VOLUME"),
        })
    }

    fn width(&self) -> usize {
        [self.open, self.high, self.low, self.close]
            .into_iter()
            .chain(self.volume)
            .max()
            .map_or(0, |max| max + 1)
    }
}

/// Parses a scrape response body into a table.
///
/// A body without data records yields an empty table.
///
/// # Errors
///
/// Returns [`ScrapeError::MalformedAnchor`] if an offset record comes before
/// any anchor, and [`ScrapeError::InvalidRecord`] for unparseable data records.
pub fn parse_scrape(body: &str, period: SamplingPeriod) -> Result<PriceTable, ScrapeError> {
    let step = i64::from(period.seconds());
    let mut columns = ColumnMap::default();
    let mut anchor: Option<i64> = None;
    let mut table = PriceTable::new();

    for (index, raw) in body.lines().enumerate() {
        let line = index + 1;
        let record = raw.trim();

        if let Some(header) = record.strip_prefix("COLUMNS=") {
            columns = ColumnMap::from_header(header).ok_or_else(|| ScrapeError::InvalidRecord {
                line,
                reason: format!("column header '{header}' lacks one of OPEN, HIGH, LOW, CLOSE"),
            })?;
            continue;
        }

        let mut fields = record.split(',');
        let first = fields.next().unwrap_or_default();

        let epoch = if let Some(stamp) = first.strip_prefix('a') {
            let stamp = stamp.parse::<i64>().map_err(|_| ScrapeError::InvalidRecord {
                line,
                reason: format!("anchor '{first}' is not an epoch"),
            })?;
            anchor = Some(stamp);
            stamp
        } else if first.starts_with(|c: char| c.is_ascii_digit()) {
            let offset = first.parse::<i64>().map_err(|_| ScrapeError::InvalidRecord {
                line,
                reason: format!("offset '{first}' is not an integer"),
            })?;
            let base = anchor.ok_or(ScrapeError::MalformedAnchor { line })?;
            step.checked_mul(offset)
                .and_then(|delta| base.checked_add(delta))
                .ok_or_else(|| ScrapeError::InvalidRecord {
                    line,
                    reason: format!("offset {offset} from anchor {base} is out of range"),
                })?
        } else {
            continue;
        };

        let values = fields
            .map(|field| field.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ScrapeError::InvalidRecord {
                line,
                reason: e.to_string(),
            })?;
        if values.len() < columns.width() {
            return Err(ScrapeError::InvalidRecord {
                line,
                reason: format!(
                    "expected {} values, found {}",
                    columns.width(),
                    values.len()
                ),
            });
        }

        let timestamp = DateTime::from_timestamp(epoch, 0).ok_or_else(|| {
            ScrapeError::InvalidRecord {
                line,
                reason: format!("timestamp {epoch} is out of range"),
            }
        })?;

        table.push(PriceBar::new(
            timestamp,
            values[columns.open],
            values[columns.high],
            values[columns.low],
            values[columns.close],
            columns.volume.map_or(0.0, |i| values[i]),
        ));
    }

    Ok(table)
}
