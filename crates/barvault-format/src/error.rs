//! Formatting errors.

use thiserror::Error;

/// Errors that can occur while rendering or compressing a table.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown compression name.
    #[error("Unknown compression: {0} (expected gzip, xz or none)")]
    UnknownCompression(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
