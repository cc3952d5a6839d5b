//! Symbol list files.

use std::path::Path;

use barvault_types::{BarvaultError, Result, SymbolList};
use futures::StreamExt;
use tracing::debug;

/// Column holding the symbols.
const SYMBOL_COLUMN: &str = "symbol";

fn invalid_data(path: &Path, err: &csv_async::Error) -> BarvaultError {
    BarvaultError::filesystem(
        path,
        std::io::Error::new(std::io::ErrorKind::InvalidData, err.to_string()),
    )
}

/// Loads the `symbol` column of a delimited file, in file order.
///
/// Values are trimmed and blank values skipped; duplicates are kept.
///
/// # Errors
///
/// Returns a filesystem error if the file cannot be read or parsed, and a
/// configuration error if it has no `symbol` column.
pub async fn load_symbol_list(path: &Path, delimiter: u8) -> Result<SymbolList> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| BarvaultError::filesystem(path, e))?;

    let mut reader = csv_async::AsyncReaderBuilder::new()
        .delimiter(delimiter)
        .create_reader(file);

    let column = reader
        .headers()
        .await
        .map_err(|e| invalid_data(path, &e))?
        .iter()
        .position(|header| header.trim() == SYMBOL_COLUMN)
        .ok_or_else(|| {
            BarvaultError::Config(format!(
                "'{}' has no '{SYMBOL_COLUMN}' column (delimiter '{}')",
                path.display(),
                char::from(delimiter)
            ))
        })?;

    let mut symbols = Vec::new();
    let mut records = reader.records();
    while let Some(record) = records.next().await {
        let record = record.map_err(|e| invalid_data(path, &e))?;
        if let Some(symbol) = record.get(column).map(str::trim).filter(|s| !s.is_empty()) {
            symbols.push(symbol.to_string());
        }
    }

    debug!(path = %path.display(), count = symbols.len(), "loaded symbol list");
    Ok(SymbolList::new(symbols))
}
