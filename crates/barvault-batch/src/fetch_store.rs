//! One fetch followed by one store.

use std::path::PathBuf;

use barvault_fetch::SourceRegistry;
use barvault_format::TableSink;
use barvault_types::{DownloadRequest, Result};
use tracing::debug;

/// Fetches a table for one request and stores it.
///
/// A single call makes one upstream request and at most one write. Retrying
/// is left to [`RetryDriver`](crate::RetryDriver).
#[derive(Debug, Clone, Copy)]
pub struct FetchAndStore<'a> {
    sources: &'a SourceRegistry,
    sink: &'a dyn TableSink,
}

impl<'a> FetchAndStore<'a> {
    /// Creates a pipeline over the given sources and sink.
    #[must_use]
    pub const fn new(sources: &'a SourceRegistry, sink: &'a dyn TableSink) -> Self {
        Self { sources, sink }
    }

    /// Returns the sink.
    #[must_use]
    pub const fn sink(&self) -> &'a dyn TableSink {
        self.sink
    }

    /// Fetches `request.symbol()` from its provider and writes the table.
    ///
    /// Nothing is written if the fetch fails.
    ///
    /// # Errors
    ///
    /// Returns the source error if the fetch fails, or a filesystem error if
    /// the table cannot be stored.
    pub async fn run(&self, request: &DownloadRequest) -> Result<PathBuf> {
        let source = self.sources.get(request.provider())?;
        let table = source.fetch(request.query()).await?;
        debug!(symbol = request.symbol(), rows = table.len(), "fetched table");
        self.sink.store(&table, request.destination())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSource, read_gzip, request, sample_table};
    use barvault_format::FileSink;
    use barvault_types::{ErrorKind, PriceTable, Provider};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fetch_and_store_writes_file() {
        let temp = TempDir::new().unwrap();
        let registry = SourceRegistry::new()
            .with_source(Arc::new(FakeSource::new(Provider::GoogleFinance, sample_table())));
        let sink = FileSink::new();

        let path = FetchAndStore::new(&registry, &sink)
            .run(&request(temp.path(), "SPX"))
            .await
            .unwrap();

        assert!(path.ends_with("google_finance/S&P500/symbols/SPX/SPX_2018-03-09.csv.gz"));
        assert_eq!(
            read_gzip(&path),
            "Date;Open;High;Low;Close;Volume\n2018-03-09 14:30:00;1;2;0.5;1.5;10\n"
        );
    }

    #[tokio::test]
    async fn test_empty_table_is_stored() {
        let temp = TempDir::new().unwrap();
        let registry = SourceRegistry::new()
            .with_source(Arc::new(FakeSource::new(Provider::GoogleFinance, PriceTable::new())));
        let sink = FileSink::new();

        let path = FetchAndStore::new(&registry, &sink)
            .run(&request(temp.path(), "SPX"))
            .await
            .unwrap();
        assert_eq!(read_gzip(&path), "Date;Open;High;Low;Close;Volume\n");
    }

    #[tokio::test]
    async fn test_failed_fetch_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let source = FakeSource::new(Provider::GoogleFinance, sample_table()).failing(1);
        let registry = SourceRegistry::new().with_source(Arc::new(source));
        let sink = FileSink::new();

        let err = FetchAndStore::new(&registry, &sink)
            .run(&request(temp.path(), "SPX"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert!(!temp.path().join("google_finance").exists());
    }

    #[tokio::test]
    async fn test_unregistered_provider_is_config_error() {
        let temp = TempDir::new().unwrap();
        let registry = SourceRegistry::new();
        let sink = FileSink::new();

        let err = FetchAndStore::new(&registry, &sink)
            .run(&request(temp.path(), "SPX"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
