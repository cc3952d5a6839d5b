//! Table sources and HTTP fetching for the barvault intraday bar downloader.
//!
//! This crate turns one upstream call into a [`PriceTable`](barvault_types::PriceTable):
//!
//! - [`DownloadClient`] - Single-attempt HTTP client; retrying is left to the caller
//! - [`url`] - Provider URL construction
//! - [`scrape::parse_scrape`] - Anchor/offset line format of the scrape endpoint
//! - [`alpha_vantage`] - Vendor JSON intraday series
//! - [`TableSource`] - Async trait implemented by every provider variant
//! - [`SourceRegistry`] - Lookup of a source by [`Provider`](barvault_types::Provider)

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barvault/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod alpha_vantage;
mod client;
mod registry;
pub mod scrape;
mod source;
pub mod url;

pub use client::{ClientConfig, DownloadClient, DownloadError};
pub use registry::{FetchConfig, SourceRegistry};
pub use source::{AlphaVantageCryptoSource, AlphaVantageSource, GoogleFinanceSource, TableSource};
