//! Instrument catalog and symbol lists for the barvault intraday bar downloader.
//!
//! This crate provides the built-in download plan (which instruments are
//! fetched from which provider and where they are filed) and loading of
//! symbol list files for batch runs.
//!
//! # Example
//!
//! ```
//! use barvault_catalog::Catalog;
//! use barvault_types::Provider;
//!
//! let catalog = Catalog::global();
//!
//! if let Some(entry) = catalog.get("spx") {
//!     println!("{} -> {}", entry.name(), entry.category());
//! }
//! assert!(catalog.for_provider(Provider::AlphaVantageCrypto).count() > 0);
//! ```

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barvault/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod symbols;

use std::path::PathBuf;
use std::sync::OnceLock;

use barvault_types::{Destination, DownloadRequest, Provider, SourceQuery};
use serde::{Deserialize, Serialize};

pub use symbols::load_symbol_list;

/// The catalog JSON embedded at compile time.
const CATALOG_JSON: &str = include_str!("../data/catalog.json");

/// Global catalog instance.
static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// One instrument of the download plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Symbol sent to the provider; also the file stem.
    symbol: String,
    /// Human-readable name.
    name: String,
    /// Category subfolder, may contain `/`.
    category: String,
    /// Providers this instrument is fetched from, in order.
    providers: Vec<Provider>,
    /// Quote currency override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency: Option<String>,
}

impl CatalogEntry {
    /// Returns the symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the category subfolder.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the providers of this instrument.
    #[must_use]
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Returns true if the instrument is fetched from `provider`.
    #[must_use]
    pub fn has_provider(&self, provider: Provider) -> bool {
        self.providers.contains(&provider)
    }

    /// Builds the download request for this instrument and provider.
    ///
    /// `template` supplies period, lookback, currency and debug flag; its
    /// symbol is replaced. The file lands directly in the category folder.
    #[must_use]
    pub fn request(
        &self,
        provider: Provider,
        root: impl Into<PathBuf>,
        template: &SourceQuery,
    ) -> DownloadRequest {
        let mut query = template.clone();
        query.symbol.clone_from(&self.symbol);
        if let Some(currency) = &self.currency {
            query.currency.clone_from(currency);
        }

        DownloadRequest::new(
            query,
            Destination::new(root, provider, &self.category, &self.symbol),
        )
        .with_name(&self.name)
    }
}

impl std::fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.symbol)
    }
}

/// Ordered download plan.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Returns the built-in catalog.
    ///
    /// The catalog is parsed lazily on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        CATALOG.get_or_init(|| Self::from_json(CATALOG_JSON).expect("Invalid catalog.json"))
    }

    /// Parses a catalog from a JSON array of entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a list of entries.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            entries: serde_json::from_str(json)?,
        })
    }

    /// Looks up an entry by symbol (case-insensitive).
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|entry| entry.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Returns all entries in declared order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entries fetched from `provider`, in declared order.
    pub fn for_provider(&self, provider: Provider) -> impl Iterator<Item = &CatalogEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.has_provider(provider))
    }

    /// Searches entries by symbol, name or category (case-insensitive).
    #[must_use]
    pub fn search(&self, pattern: &str) -> Vec<&CatalogEntry> {
        let pattern = pattern.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                entry.symbol.to_lowercase().contains(&pattern)
                    || entry.name.to_lowercase().contains(&pattern)
                    || entry.category.to_lowercase().contains(&pattern)
            })
            .collect()
    }

    /// Returns the (provider, entry) pairs to download.
    ///
    /// Providers are visited in [`Provider::all`] order and, within a
    /// provider, entries in declared order. `only` restricts the plan to one
    /// provider.
    #[must_use]
    pub fn plan(&self, only: Option<Provider>) -> Vec<(Provider, &CatalogEntry)> {
        Provider::all()
            .iter()
            .copied()
            .filter(|provider| only.is_none_or(|wanted| wanted == *provider))
            .flat_map(|provider| self.for_provider(provider).map(move |entry| (provider, entry)))
            .collect()
    }
}
