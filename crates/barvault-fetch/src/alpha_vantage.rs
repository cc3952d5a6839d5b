//! Alpha Vantage intraday series.
//!
//! Both the equity (`TIME_SERIES_INTRADAY`) and digital currency
//! (`DIGITAL_CURRENCY_INTRADAY`) endpoints answer with a JSON object holding a
//! `Time Series (...)` map keyed by timestamp. Failures come back with a 200
//! status and an `Error Message`, `Note` or `Information` key instead.

use std::collections::{BTreeMap, HashMap};

use barvault_types::{PriceBar, PriceTable};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while parsing an Alpha Vantage response.
#[derive(Error, Debug)]
pub enum VendorError {
    /// The API answered with an error, rate-limit note or information message.
    #[error("API message: {0}")]
    Api(String),

    /// Neither a time series nor an error message was present.
    #[error("response has no time series")]
    MissingSeries,

    /// The body is not the expected JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A row could not be converted into a bar.
    #[error("invalid row at {timestamp}: {reason}")]
    InvalidRow {
        /// Row key.
        timestamp: String,
        /// What was wrong with it.
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    // "Meta Data" and the interval-dependent "Time Series (...)" key.
    #[serde(flatten)]
    rest: HashMap<String, serde_json::Value>,
}

impl SeriesResponse {
    /// Takes the time series out of the response, or the API message explaining its absence.
    fn into_series(mut self) -> Result<serde_json::Value, VendorError> {
        let key = self
            .rest
            .keys()
            .find(|key| key.starts_with("Time Series"))
            .cloned();

        if let Some(series) = key.and_then(|key| self.rest.remove(&key)) {
            return Ok(series);
        }

        match self.error_message.or(self.note).or(self.information) {
            Some(message) => Err(VendorError::Api(message)),
            None => Err(VendorError::MissingSeries),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IntradayQuote {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

/// Crypto rows name their fields after the market currency, e.g. `1a. price (USD)`.
#[derive(Debug, Deserialize)]
struct CryptoQuote {
    #[serde(flatten)]
    fields: HashMap<String, serde_json::Value>,
}

impl CryptoQuote {
    fn field(&self, prefixes: &[&str]) -> Option<&str> {
        prefixes.iter().find_map(|prefix| {
            self.fields
                .iter()
                .filter(|(key, _)| key.starts_with(prefix))
                .min_by(|(a, _), (b, _)| a.cmp(b))
                .and_then(|(_, value)| value.as_str())
        })
    }
}

fn parse_timestamp(key: &str) -> Result<DateTime<Utc>, VendorError> {
    NaiveDateTime::parse_from_str(key, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(key, "%Y-%m-%d %H:%M"))
        .map(|naive| naive.and_utc())
        .map_err(|e| VendorError::InvalidRow {
            timestamp: key.to_string(),
            reason: e.to_string(),
        })
}

fn parse_number(key: &str, name: &str, value: Option<&str>) -> Result<f64, VendorError> {
    let raw = value.ok_or_else(|| VendorError::InvalidRow {
        timestamp: key.to_string(),
        reason: format!("missing {name}"),
    })?;
    raw.trim().parse::<f64>().map_err(|e| VendorError::InvalidRow {
        timestamp: key.to_string(),
        reason: format!("{name} '{raw}': {e}"),
    })
}

/// Parses a `TIME_SERIES_INTRADAY` response.
///
/// Rows come out in ascending timestamp order. Timestamps are taken as given
/// by the API and labelled UTC.
///
/// # Errors
///
/// Returns an error for API messages, missing series or malformed rows.
pub fn parse_intraday(body: &str) -> Result<PriceTable, VendorError> {
    let response: SeriesResponse = serde_json::from_str(body)?;
    let series: BTreeMap<String, IntradayQuote> = serde_json::from_value(response.into_series()?)?;

    series
        .iter()
        .map(|(key, quote)| -> Result<PriceBar, VendorError> {
            Ok(PriceBar::new(
                parse_timestamp(key)?,
                parse_number(key, "open", Some(&quote.open))?,
                parse_number(key, "high", Some(&quote.high))?,
                parse_number(key, "low", Some(&quote.low))?,
                parse_number(key, "close", Some(&quote.close))?,
                parse_number(key, "volume", Some(&quote.volume))?,
            ))
        })
        .collect()
}

/// Parses a `DIGITAL_CURRENCY_INTRADAY` response.
///
/// Rows carrying a single price get it as open, high, low and close. Rows in
/// the newer OHLC shape are mapped field by field.
///
/// # Errors
///
/// Returns an error for API messages, missing series or malformed rows.
pub fn parse_crypto_intraday(body: &str) -> Result<PriceTable, VendorError> {
    let response: SeriesResponse = serde_json::from_str(body)?;
    let series: BTreeMap<String, CryptoQuote> = serde_json::from_value(response.into_series()?)?;

    series
        .iter()
        .map(|(key, quote)| -> Result<PriceBar, VendorError> {
            let timestamp = parse_timestamp(key)?;
            let volume = parse_number(key, "volume", quote.field(&["2. volume", "5. volume"]))?;

            if let Some(price) = quote.field(&["1a. price", "1b. price"]) {
                let price = parse_number(key, "price", Some(price))?;
                return Ok(PriceBar::flat(timestamp, price, volume));
            }

            Ok(PriceBar::new(
                timestamp,
                parse_number(key, "open", quote.field(&["1. open", "1a. open"]))?,
                parse_number(key, "high", quote.field(&["2. high", "2a. high"]))?,
                parse_number(key, "low", quote.field(&["3. low", "3a. low"]))?,
                parse_number(key, "close", quote.field(&["4. close", "4a. close"]))?,
                volume,
            ))
        })
        .collect()
}
