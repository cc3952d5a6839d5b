//! Ordered symbol lists.

use serde::{Deserialize, Serialize};

use crate::BarvaultError;

/// Ordered list of symbols to download.
///
/// Order is significant: it fixes progress numbering and the resume
/// position. Duplicates are kept as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolList {
    symbols: Vec<String>,
}

impl SymbolList {
    /// Creates a list from symbols in order.
    #[must_use]
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the symbols as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.symbols
    }

    /// Returns an iterator over the symbols.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    /// Returns the number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the index of the first occurrence of `symbol`.
    #[must_use]
    pub fn position(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// Returns the index the batch starts from.
    ///
    /// `None` or an empty string starts at the beginning. Otherwise the batch
    /// starts at the first occurrence of `resume_from`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `resume_from` is not in the list.
    pub fn resume_index(&self, resume_from: Option<&str>) -> Result<usize, BarvaultError> {
        match resume_from.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(0),
            Some(symbol) => self.position(symbol).ok_or_else(|| {
                BarvaultError::Config(format!(
                    "resume symbol '{symbol}' is not in the symbol list"
                ))
            }),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for SymbolList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
