//! Delimited text output.

use barvault_types::PriceTable;
use std::io::Write;

use crate::FormatError;

/// Delimited text formatter.
///
/// Writes a `Date` index column followed by `Open`, `High`, `Low`, `Close`
/// and `Volume`, one row per bar, in table order.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: semicolon).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Timestamp layout of the `Date` column.
    pub const DATE_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    /// Creates a new formatter with `;` as delimiter and a header row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ';',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Returns the field delimiter.
    #[must_use]
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Writes a table to the output.
    ///
    /// An empty table produces only the header row (or nothing without one).
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_table<W: Write>(&self, table: &PriceTable, mut writer: W) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(writer, "Date{d}Open{d}High{d}Low{d}Close{d}Volume")?;
        }

        for bar in table {
            writeln!(
                writer,
                "{}{d}{}{d}{}{d}{}{d}{}{d}{}",
                bar.timestamp.format(Self::DATE_FORMAT),
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                bar.volume
            )?;
        }

        writer.flush()?;
        Ok(())
    }
}
