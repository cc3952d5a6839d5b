//! Core types for the barvault intraday bar downloader.
//!
//! This crate provides the data model shared by every other barvault crate:
//!
//! - [`PriceBar`] / [`PriceTable`] - Time-indexed OHLCV rows as returned by a provider
//! - [`Provider`] - Upstream data provider and its output subfolder
//! - [`SamplingPeriod`] / [`LookbackWindow`] - Query parameters
//! - [`DownloadRequest`] / [`Destination`] - One download and where it lands
//! - [`SymbolList`] - Ordered symbol list with index-based resume
//! - [`BarvaultError`] / [`ErrorKind`] - Error taxonomy

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barvault/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod error;
mod lookback;
mod period;
mod provider;
mod request;
mod symbols;

pub use bar::{PriceBar, PriceTable};
pub use error::{BarvaultError, ErrorKind, Result};
pub use lookback::LookbackWindow;
pub use period::{PeriodParseError, SamplingPeriod};
pub use provider::{Provider, ProviderParseError};
pub use request::{Destination, DownloadRequest, SourceQuery};
pub use symbols::SymbolList;
