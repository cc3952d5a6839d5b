//! Lookup of table sources by provider.

use std::collections::HashMap;
use std::sync::Arc;

use barvault_types::{BarvaultError, Provider, Result};

use crate::url::{ALPHA_VANTAGE_URL, GOOGLE_FINANCE_URL};
use crate::{
    AlphaVantageCryptoSource, AlphaVantageSource, ClientConfig, DownloadClient,
    GoogleFinanceSource, TableSource,
};

/// Configuration for the built-in sources.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// HTTP client settings shared by all sources.
    pub client: ClientConfig,
    /// Alpha Vantage API key.
    pub api_key: Option<String>,
    /// Scrape endpoint URL.
    pub google_finance_url: String,
    /// Alpha Vantage endpoint URL.
    pub alpha_vantage_url: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            api_key: None,
            google_finance_url: GOOGLE_FINANCE_URL.to_string(),
            alpha_vantage_url: ALPHA_VANTAGE_URL.to_string(),
        }
    }
}

impl FetchConfig {
    /// Sets the Alpha Vantage API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }
}

/// Table sources keyed by the provider they serve.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: HashMap<Provider, Arc<dyn TableSource>>,
}

impl SourceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding all built-in sources.
    ///
    /// The Alpha Vantage sources are registered even without an API key and
    /// fail with a configuration error when used.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        let client = DownloadClient::new(config.client.clone())
            .map_err(|e| BarvaultError::Config(format!("cannot create HTTP client: {e}")))?;

        Ok(Self::new()
            .with_source(Arc::new(
                GoogleFinanceSource::new(client.clone())
                    .with_base_url(&config.google_finance_url),
            ))
            .with_source(Arc::new(
                AlphaVantageSource::new(client.clone(), config.api_key.clone())
                    .with_base_url(&config.alpha_vantage_url),
            ))
            .with_source(Arc::new(
                AlphaVantageCryptoSource::new(client, config.api_key.clone())
                    .with_base_url(&config.alpha_vantage_url),
            )))
    }

    /// Adds a source, replacing any source for the same provider.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn TableSource>) -> Self {
        self.register(source);
        self
    }

    /// Adds a source, replacing any source for the same provider.
    pub fn register(&mut self, source: Arc<dyn TableSource>) {
        self.sources.insert(source.provider(), source);
    }

    /// Returns the source for `provider`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no source serves `provider`.
    pub fn get(&self, provider: Provider) -> Result<&dyn TableSource> {
        self.sources
            .get(&provider)
            .map(AsRef::as_ref)
            .ok_or_else(|| BarvaultError::Config(format!("no source registered for {provider}")))
    }

    /// Returns the registered providers in a stable order.
    #[must_use]
    pub fn providers(&self) -> Vec<Provider> {
        let mut providers: Vec<Provider> = self.sources.keys().copied().collect();
        providers.sort();
        providers
    }
}
