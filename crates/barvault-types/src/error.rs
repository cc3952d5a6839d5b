//! Error types for barvault.

use std::path::PathBuf;

use thiserror::Error;

use crate::Provider;

/// Result type alias for barvault operations.
pub type Result<T> = std::result::Result<T, BarvaultError>;

/// Errors that can occur while fetching and storing price tables.
#[derive(Error, Debug)]
pub enum BarvaultError {
    /// The provider could not be reached, answered with a failure status,
    /// or returned a payload that could not be parsed.
    #[error("Upstream error from {provider}: {message}")]
    Upstream {
        /// Provider that failed.
        provider: Provider,
        /// Description of the failure.
        message: String,
    },

    /// An offset record appeared before any anchor record in a scrape response.
    #[error("Malformed response: offset record on line {line} precedes any anchor record")]
    MalformedAnchor {
        /// 1-based line number of the offending record.
        line: usize,
    },

    /// A filesystem operation failed.
    #[error("Filesystem error at '{}': {source}", .path.display())]
    Filesystem {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Serializing a table failed.
    #[error("Format error: {0}")]
    Format(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration or request parameters.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BarvaultError {
    /// Creates an upstream error for the given provider.
    pub fn upstream(provider: Provider, message: impl Into<String>) -> Self {
        Self::Upstream {
            provider,
            message: message.into(),
        }
    }

    /// Creates a filesystem error for the given path.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Returns the kind used to decide whether this error is retried.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Upstream { .. } => ErrorKind::Upstream,
            Self::MalformedAnchor { .. } => ErrorKind::MalformedAnchor,
            Self::Filesystem { .. } | Self::Format(_) | Self::Json(_) => ErrorKind::Filesystem,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

/// Coarse classification of [`BarvaultError`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    /// Network failure, failure status or unparseable payload.
    Upstream,
    /// Offset record without a preceding anchor.
    MalformedAnchor,
    /// Directory creation, write or serialization failure.
    Filesystem,
    /// Invalid request or missing configuration.
    Config,
}

impl ErrorKind {
    /// Returns the kind as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Upstream => "upstream",
            Self::MalformedAnchor => "malformed-anchor",
            Self::Filesystem => "filesystem",
            Self::Config => "config",
        }
    }

    /// Returns all error kinds.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Upstream,
            Self::MalformedAnchor,
            Self::Filesystem,
            Self::Config,
        ]
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = BarvaultError::upstream(Provider::GoogleFinance, "status 503");
        assert_eq!(err.kind(), ErrorKind::Upstream);

        let err = BarvaultError::filesystem("/tmp/x", std::io::Error::other("disk full"));
        assert_eq!(err.kind(), ErrorKind::Filesystem);

        assert_eq!(
            BarvaultError::MalformedAnchor { line: 3 }.kind(),
            ErrorKind::MalformedAnchor
        );
        assert_eq!(
            BarvaultError::Config("no key".into()).kind(),
            ErrorKind::Config
        );
    }

    #[test]
    fn test_error_messages() {
        let err = BarvaultError::upstream(Provider::AlphaVantage, "status 429");
        assert_eq!(err.to_string(), "Upstream error from alpha_vantage: status 429");

        let err = BarvaultError::MalformedAnchor { line: 8 };
        assert!(err.to_string().contains("line 8"));
    }
}
