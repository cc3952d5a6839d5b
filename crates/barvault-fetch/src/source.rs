//! Table sources, one per upstream provider.

use async_trait::async_trait;
use barvault_types::{BarvaultError, PriceTable, Provider, Result, SourceQuery};
use reqwest::Url;
use tracing::{debug, info};

use crate::alpha_vantage::{self, VendorError};
use crate::scrape::{self, ScrapeError};
use crate::{DownloadClient, DownloadError, url};

/// A provider that returns a price table for a symbol.
///
/// Each call performs exactly one upstream request and either maps the
/// response to a table or fails. An empty table is a successful result.
#[async_trait]
pub trait TableSource: Send + Sync + std::fmt::Debug {
    /// Provider this source talks to.
    fn provider(&self) -> Provider;

    /// Fetches the table for `query.symbol`.
    async fn fetch(&self, query: &SourceQuery) -> Result<PriceTable>;
}

fn log_request(provider: Provider, query: &SourceQuery, shown: &str) {
    if query.debug {
        info!(%provider, symbol = %query.symbol, "GET {shown}");
    } else {
        debug!(%provider, symbol = %query.symbol, "GET {shown}");
    }
}

fn download_error(provider: Provider, err: DownloadError) -> BarvaultError {
    BarvaultError::upstream(provider, err.to_string())
}

fn vendor_error(provider: Provider, err: VendorError) -> BarvaultError {
    BarvaultError::upstream(provider, err.to_string())
}

/// Source for the line-oriented scrape endpoint.
#[derive(Debug, Clone)]
pub struct GoogleFinanceSource {
    client: DownloadClient,
    base_url: String,
}

impl GoogleFinanceSource {
    /// Creates a source against the public endpoint.
    #[must_use]
    pub fn new(client: DownloadClient) -> Self {
        Self {
            client,
            base_url: url::GOOGLE_FINANCE_URL.to_string(),
        }
    }

    /// Overrides the endpoint URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TableSource for GoogleFinanceSource {
    fn provider(&self) -> Provider {
        Provider::GoogleFinance
    }

    async fn fetch(&self, query: &SourceQuery) -> Result<PriceTable> {
        let provider = self.provider();
        let url = url::google_finance_url(&self.base_url, query)?;
        log_request(provider, query, url.as_str());

        let body = self
            .client
            .get_text(url)
            .await
            .map_err(|e| download_error(provider, e))?;

        let table = scrape::parse_scrape(&body, query.period).map_err(|e| match e {
            ScrapeError::MalformedAnchor { line } => BarvaultError::MalformedAnchor { line },
            other => BarvaultError::upstream(provider, other.to_string()),
        })?;
        debug!(%provider, symbol = %query.symbol, rows = table.len(), "parsed scrape response");
        Ok(table)
    }
}

/// Shared state of the two Alpha Vantage sources.
#[derive(Debug, Clone)]
struct VendorEndpoint {
    client: DownloadClient,
    api_key: Option<String>,
    base_url: String,
}

impl VendorEndpoint {
    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                BarvaultError::Config(
                    "Alpha Vantage API key is not configured (set ALPHA_VANTAGE_API_KEY)".into(),
                )
            })
    }

    async fn get(&self, provider: Provider, query: &SourceQuery, url: Url) -> Result<String> {
        let shown = url::redacted(&url, self.api_key.as_deref().unwrap_or_default());
        log_request(provider, query, &shown);
        self.client
            .get_text(url)
            .await
            .map_err(|e| download_error(provider, e))
    }
}

/// Source for Alpha Vantage equity intraday series.
#[derive(Debug, Clone)]
pub struct AlphaVantageSource {
    endpoint: VendorEndpoint,
}

impl AlphaVantageSource {
    /// Creates a source against the public endpoint.
    #[must_use]
    pub fn new(client: DownloadClient, api_key: Option<String>) -> Self {
        Self {
            endpoint: VendorEndpoint {
                client,
                api_key,
                base_url: url::ALPHA_VANTAGE_URL.to_string(),
            },
        }
    }

    /// Overrides the endpoint URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.endpoint.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TableSource for AlphaVantageSource {
    fn provider(&self) -> Provider {
        Provider::AlphaVantage
    }

    async fn fetch(&self, query: &SourceQuery) -> Result<PriceTable> {
        let provider = self.provider();
        let url =
            url::alpha_vantage_intraday_url(&self.endpoint.base_url, query, self.endpoint.api_key()?)?;
        let body = self.endpoint.get(provider, query, url).await?;

        alpha_vantage::parse_intraday(&body).map_err(|e| vendor_error(provider, e))
    }
}

/// Source for Alpha Vantage digital currency intraday series.
///
/// The query currency is sent as the quote market.
#[derive(Debug, Clone)]
pub struct AlphaVantageCryptoSource {
    endpoint: VendorEndpoint,
}

impl AlphaVantageCryptoSource {
    /// Creates a source against the public endpoint.
    #[must_use]
    pub fn new(client: DownloadClient, api_key: Option<String>) -> Self {
        Self {
            endpoint: VendorEndpoint {
                client,
                api_key,
                base_url: url::ALPHA_VANTAGE_URL.to_string(),
            },
        }
    }

    /// Overrides the endpoint URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.endpoint.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TableSource for AlphaVantageCryptoSource {
    fn provider(&self) -> Provider {
        Provider::AlphaVantageCrypto
    }

    async fn fetch(&self, query: &SourceQuery) -> Result<PriceTable> {
        let provider = self.provider();
        let url =
            url::alpha_vantage_crypto_url(&self.endpoint.base_url, query, self.endpoint.api_key()?)?;
        let body = self.endpoint.get(provider, query, url).await?;

        alpha_vantage::parse_crypto_intraday(&body).map_err(|e| vendor_error(provider, e))
    }
}
