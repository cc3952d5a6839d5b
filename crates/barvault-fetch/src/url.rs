//! Provider URL construction.

use barvault_types::{BarvaultError, SourceQuery};
use reqwest::Url;

/// Base URL of the scrape endpoint.
pub const GOOGLE_FINANCE_URL: &str = "https://finance.google.com/finance/getprices";

/// Base URL of the Alpha Vantage query endpoint.
pub const ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";

/// Column selection requested from the scrape endpoint.
const SCRAPE_FIELDS: &str = "d,o,h,l,c,v";

fn build(base: &str, params: &[(&str, &str)]) -> Result<Url, BarvaultError> {
    Url::parse_with_params(base, params)
        .map_err(|e| BarvaultError::Config(format!("invalid base URL '{base}': {e}")))
}

/// Builds the scrape endpoint URL.
///
/// # Example
///
/// ```
/// use barvault_fetch::url::{GOOGLE_FINANCE_URL, google_finance_url};
/// use barvault_types::SourceQuery;
///
/// let url = google_finance_url(GOOGLE_FINANCE_URL, &SourceQuery::new("SPY")).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://finance.google.com/finance/getprices?p=20d&f=d%2Co%2Ch%2Cl%2Cc%2Cv&q=SPY&i=60&x=USD"
/// );
/// ```
///
/// # Errors
///
/// Returns a configuration error if `base` is not a valid URL.
pub fn google_finance_url(base: &str, query: &SourceQuery) -> Result<Url, BarvaultError> {
    let days = query.lookback.as_query();
    let period = query.period.seconds().to_string();
    build(
        base,
        &[
            ("p", days.as_str()),
            ("f", SCRAPE_FIELDS),
            ("q", query.symbol.as_str()),
            ("i", period.as_str()),
            ("x", query.currency.as_str()),
        ],
    )
}

/// Builds the Alpha Vantage equity intraday URL.
///
/// # Errors
///
/// Returns a configuration error if the sampling period has no matching
/// upstream interval or `base` is not a valid URL.
pub fn alpha_vantage_intraday_url(
    base: &str,
    query: &SourceQuery,
    api_key: &str,
) -> Result<Url, BarvaultError> {
    let interval = query.period.alpha_vantage_interval().ok_or_else(|| {
        BarvaultError::Config(format!(
            "sampling period {} has no Alpha Vantage interval (use 60, 300, 900, 1800 or 3600)",
            query.period
        ))
    })?;
    build(
        base,
        &[
            ("function", "TIME_SERIES_INTRADAY"),
            ("symbol", query.symbol.as_str()),
            ("interval", interval),
            ("outputsize", "full"),
            ("apikey", api_key),
        ],
    )
}

/// Builds the Alpha Vantage digital currency intraday URL.
///
/// # Errors
///
/// Returns a configuration error if `base` is not a valid URL.
pub fn alpha_vantage_crypto_url(
    base: &str,
    query: &SourceQuery,
    api_key: &str,
) -> Result<Url, BarvaultError> {
    build(
        base,
        &[
            ("function", "DIGITAL_CURRENCY_INTRADAY"),
            ("symbol", query.symbol.as_str()),
            ("market", query.currency.as_str()),
            ("apikey", api_key),
        ],
    )
}

/// Returns the URL as a string with the API key masked.
#[must_use]
pub fn redacted(url: &Url, api_key: &str) -> String {
    if api_key.is_empty() {
        url.to_string()
    } else {
        url.as_str().replace(api_key, "***")
    }
}
