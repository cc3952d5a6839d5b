//! Library for downloading and archiving intraday price bars.
//!
//! This is a facade crate that re-exports functionality from the barvault
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```no_run
//! use barvault_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let sources = SourceRegistry::from_config(&FetchConfig::default())?;
//!     let sink = FileSink::new();
//!     let policy = RetryPolicy::default();
//!     let driver = RetryDriver::new(FetchAndStore::new(&sources, &sink), &policy, &LogReporter);
//!
//!     let spx = Catalog::global().get("SPX").ok_or("SPX missing")?;
//!     let request = spx.request(Provider::GoogleFinance, "data", &SourceQuery::new(""));
//!
//!     match driver.run_with_retry(&request).await {
//!         RetryOutcome::Succeeded { path, .. } => println!("stored {}", path.display()),
//!         RetryOutcome::Exhausted { error, .. } => eprintln!("gave up: {error}"),
//!     }
//!     Ok(())
//! }
//! ```

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barvault/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use barvault_types::*;

// Re-export catalog
pub use barvault_catalog::{Catalog, CatalogEntry, load_symbol_list};

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use barvault_fetch::{
    AlphaVantageCryptoSource, AlphaVantageSource, ClientConfig, DownloadClient, DownloadError,
    FetchConfig, GoogleFinanceSource, SourceRegistry, TableSource,
};

// Re-export persistence
#[cfg(feature = "format")]
pub use barvault_format::{Compression, CsvFormatter, FileSink, FormatError, TableSink};

// Re-export drivers
#[cfg(feature = "batch")]
pub use barvault_batch::{
    BatchReporter, BatchRun, BatchRunner, BatchSummary, COMPLETION_MARKER, FetchAndStore,
    LogReporter, RetryDriver, RetryOutcome, RetryPolicy, RunId, RunParams, RunStatus, RunTracker,
    StateError, StateManager, SymbolTask, TaskStatus, report,
};

/// Prelude module for convenient imports.
///
/// ```
/// use barvault_lib::prelude::*;
/// ```
pub mod prelude {
    pub use barvault_types::{
        BarvaultError, Destination, DownloadRequest, ErrorKind, LookbackWindow, PriceBar,
        PriceTable, Provider, Result, SamplingPeriod, SourceQuery, SymbolList,
    };

    pub use barvault_catalog::{Catalog, CatalogEntry, load_symbol_list};

    #[cfg(feature = "fetch")]
    pub use barvault_fetch::{FetchConfig, SourceRegistry, TableSource};

    #[cfg(feature = "format")]
    pub use barvault_format::{Compression, FileSink, TableSink};

    #[cfg(feature = "batch")]
    pub use barvault_batch::{
        BatchReporter, BatchRunner, BatchSummary, FetchAndStore, LogReporter, RetryDriver,
        RetryOutcome, RetryPolicy,
    };
}
