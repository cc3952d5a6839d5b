//! Download requests and output destinations.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{LookbackWindow, Provider, SamplingPeriod};

/// Parameters handed to a table source for one upstream call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceQuery {
    /// Ticker symbol as understood by the provider.
    pub symbol: String,
    /// Bar spacing.
    pub period: SamplingPeriod,
    /// Days of history requested.
    pub lookback: LookbackWindow,
    /// Quote currency or exchange tag.
    pub currency: String,
    /// Log the request URL at info level.
    pub debug: bool,
}

impl SourceQuery {
    /// Default quote currency.
    pub const DEFAULT_CURRENCY: &'static str = "USD";

    /// Creates a query with default period, lookback and currency.
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            period: SamplingPeriod::default(),
            lookback: LookbackWindow::default(),
            currency: Self::DEFAULT_CURRENCY.to_string(),
            debug: false,
        }
    }

    /// Sets the sampling period.
    #[must_use]
    pub const fn with_period(mut self, period: SamplingPeriod) -> Self {
        self.period = period;
        self
    }

    /// Sets the lookback window.
    #[must_use]
    pub const fn with_lookback(mut self, lookback: LookbackWindow) -> Self {
        self.lookback = lookback;
        self
    }

    /// Sets the quote currency tag.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Enables URL logging at info level.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Where a table for one symbol is written.
///
/// The directory is `<root>/<provider>/<category>[/<symbol>]` and the file
/// name is `<stem>_<YYYY-MM-DD>.<extension>`. Unless a date is pinned with
/// [`Destination::with_date`], the date is the local day the file name is
/// built, so a batch running past midnight dates later files with the new day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    root: PathBuf,
    provider: Provider,
    category: PathBuf,
    symbol_dir: Option<String>,
    stem: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
}

impl Destination {
    /// Creates a destination dated at write time (local day).
    #[must_use]
    pub fn new(
        root: impl Into<PathBuf>,
        provider: Provider,
        category: impl Into<PathBuf>,
        stem: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            provider,
            category: category.into(),
            symbol_dir: None,
            stem: stem.into(),
            date: None,
        }
    }

    /// Adds a per-symbol subfolder below the category.
    #[must_use]
    pub fn with_symbol_dir(mut self, symbol: impl Into<String>) -> Self {
        self.symbol_dir = Some(symbol.into());
        self
    }

    /// Sets the file stem.
    #[must_use]
    pub fn with_stem(mut self, stem: impl Into<String>) -> Self {
        self.stem = stem.into();
        self
    }

    /// Pins the date embedded in the file name.
    #[must_use]
    pub const fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the provider whose subfolder this destination uses.
    #[must_use]
    pub const fn provider(&self) -> Provider {
        self.provider
    }

    /// Returns the category subfolder.
    #[must_use]
    pub fn category(&self) -> &Path {
        &self.category
    }

    /// Returns the file stem.
    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Returns the pinned file date, if any.
    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Returns the date a file written now gets.
    #[must_use]
    pub fn file_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Returns the directory the file is written to.
    #[must_use]
    pub fn directory(&self) -> PathBuf {
        let mut dir = self
            .root
            .join(self.provider.as_str())
            .join(&self.category);
        if let Some(symbol) = &self.symbol_dir {
            dir.push(symbol);
        }
        dir
    }

    /// Returns the file name for the given extension (without leading dot).
    #[must_use]
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}_{}.{extension}", self.stem, self.file_date().format("%Y-%m-%d"))
    }

    /// Returns the full output path for the given extension.
    #[must_use]
    pub fn file_path(&self, extension: &str) -> PathBuf {
        self.directory().join(self.file_name(extension))
    }
}

/// A single download: what to fetch, from whom, and where to store it.
///
/// Requests are immutable once built. A batch derives one request per symbol
/// from a template with [`DownloadRequest::for_symbol`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    query: SourceQuery,
    destination: Destination,
    name: String,
}

impl DownloadRequest {
    /// Creates a request. The display name defaults to the symbol.
    #[must_use]
    pub fn new(query: SourceQuery, destination: Destination) -> Self {
        let name = query.symbol.clone();
        Self {
            query,
            destination,
            name,
        }
    }

    /// Sets the display name used in diagnostics.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the date embedded in the output file name.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.destination = self.destination.with_date(date);
        self
    }

    /// Derives the request for one symbol of a batch.
    ///
    /// The symbol replaces the query symbol, the display name and the file
    /// stem, and becomes the symbol subfolder of the destination.
    #[must_use]
    pub fn for_symbol(&self, symbol: &str) -> Self {
        let mut query = self.query.clone();
        query.symbol = symbol.to_string();
        Self {
            query,
            destination: self
                .destination
                .clone()
                .with_symbol_dir(symbol)
                .with_stem(symbol),
            name: symbol.to_string(),
        }
    }

    /// Returns the source query.
    #[must_use]
    pub const fn query(&self) -> &SourceQuery {
        &self.query
    }

    /// Returns the symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.query.symbol
    }

    /// Returns the provider.
    #[must_use]
    pub const fn provider(&self) -> Provider {
        self.destination.provider
    }

    /// Returns the destination.
    #[must_use]
    pub const fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
