//! Table serialization and storage for the barvault intraday bar downloader.
//!
//! This crate writes price tables to disk:
//!
//! - [`CsvFormatter`] - Delimited text rendering of a table (`;` by default)
//! - [`Compression`] - gzip, xz or uncompressed output
//! - [`TableSink`] / [`FileSink`] - Stores a table at its destination

#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barvault/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod compression;
mod csv;
mod error;
mod sink;

pub use crate::csv::CsvFormatter;
pub use compression::Compression;
pub use error::FormatError;
pub use sink::{FileSink, TableSink};
