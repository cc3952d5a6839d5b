//! Retry, resume and run tracking for the barvault intraday bar downloader.
//!
//! This crate drives downloads built from the fetch and format crates:
//!
//! - [`FetchAndStore`] - One fetch followed by one store, no retry
//! - [`RetryDriver`] - Bounded retry with a fixed delay between attempts
//! - [`BatchRunner`] - Ordered, resumable iteration over a symbol list
//! - [`BatchReporter`] - Progress lines and diagnostics
//! - [`BatchRun`] and [`StateManager`] - Persistent run reports
//! - [`RunTracker`] - Records a batch into its run report
//!
//! # Example
//!
//! ```no_run
//! use barvault_batch::{BatchRunner, FetchAndStore, LogReporter, RetryDriver, RetryPolicy};
//! use barvault_fetch::{FetchConfig, SourceRegistry};
//! use barvault_format::FileSink;
//! use barvault_types::{Destination, DownloadRequest, Provider, SourceQuery, SymbolList};
//!
//! # async fn run() -> barvault_types::Result<()> {
//! let sources = SourceRegistry::from_config(&FetchConfig::default())?;
//! let sink = FileSink::new();
//! let policy = RetryPolicy::default();
//! let driver = RetryDriver::new(FetchAndStore::new(&sources, &sink), &policy, &LogReporter);
//!
//! let template = DownloadRequest::new(
//!     SourceQuery::new(""),
//!     Destination::new("data", Provider::GoogleFinance, "S&P500/symbols", ""),
//! );
//! let symbols = SymbolList::new(["AAPL", "MSFT", "AMZN"]);
//!
//! let summary = BatchRunner::new(driver)
//!     .run_batch(&symbols, Some("MSFT"), &template)
//!     .await?;
//! println!("{} stored, {} given up", summary.succeeded.len(), summary.exhausted.len());
//! # Ok(())
//! # }
//! ```

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barvault/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod batch;
mod fetch_store;
pub mod report;
mod retry;
mod run;
mod state;
mod tracker;

#[cfg(test)]
mod testing;

pub use batch::{BatchRunner, BatchSummary};
pub use fetch_store::FetchAndStore;
pub use report::{BatchReporter, COMPLETION_MARKER, LogReporter};
pub use retry::{RetryDriver, RetryOutcome, RetryPolicy};
pub use run::{BatchRun, RunId, RunParams, RunStatus, SymbolTask, TaskStatus};
pub use state::{Result, StateError, StateManager};
pub use tracker::RunTracker;
