//! Persisting tables to their destination.

use std::fs;
use std::path::PathBuf;

use barvault_types::{BarvaultError, Destination, PriceTable, Result};
use tracing::debug;

use crate::{Compression, CsvFormatter};

/// Something that can store a table at a destination.
pub trait TableSink: Send + Sync + std::fmt::Debug {
    /// Stores `table`, returning the path written.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be serialized or written.
    fn store(&self, table: &PriceTable, destination: &Destination) -> Result<PathBuf>;

    /// Returns the path `store` writes to for `destination`.
    fn path_for(&self, destination: &Destination) -> PathBuf;
}

/// Writes compressed delimited files under the destination directory.
///
/// Missing directories are created. An existing file with the same name is
/// replaced. The file is written next to its final name and renamed into
/// place, so a failed write leaves no partial file behind.
#[derive(Debug, Clone, Default)]
pub struct FileSink {
    formatter: CsvFormatter,
    compression: Compression,
}

impl FileSink {
    /// Creates a sink writing gzip-compressed `;`-delimited files.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            formatter: CsvFormatter::new(),
            compression: Compression::Gzip,
        }
    }

    /// Sets the formatter.
    #[must_use]
    pub const fn with_formatter(mut self, formatter: CsvFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Sets the compression.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Returns the compression.
    #[must_use]
    pub const fn compression(&self) -> Compression {
        self.compression
    }
}

impl TableSink for FileSink {
    fn store(&self, table: &PriceTable, destination: &Destination) -> Result<PathBuf> {
        let dir = destination.directory();
        fs::create_dir_all(&dir).map_err(|e| BarvaultError::filesystem(&dir, e))?;

        let mut raw = Vec::new();
        self.formatter
            .write_table(table, &mut raw)
            .map_err(|e| BarvaultError::Format(e.to_string()))?;
        let bytes = self
            .compression
            .encode(&raw)
            .map_err(|e| BarvaultError::Format(e.to_string()))?;

        let file_name = destination.file_name(self.compression.extension());
        let path = dir.join(&file_name);
        let partial = dir.join(format!(".{file_name}.partial"));

        let written = fs::write(&partial, &bytes)
            .map_err(|e| BarvaultError::filesystem(&partial, e))
            .and_then(|()| {
                fs::rename(&partial, &path).map_err(|e| BarvaultError::filesystem(&path, e))
            });
        if let Err(e) = written {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }

        debug!(path = %path.display(), rows = table.len(), bytes = bytes.len(), "stored table");
        Ok(path)
    }

    fn path_for(&self, destination: &Destination) -> PathBuf {
        destination.file_path(self.compression.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barvault_types::{ErrorKind, PriceBar, Provider};
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::io::Read;
    use tempfile::TempDir;

    fn destination(root: &std::path::Path) -> Destination {
        Destination::new(root, Provider::GoogleFinance, "S&P500/index", "SPX")
            .with_date(NaiveDate::from_ymd_opt(2018, 3, 9).unwrap())
    }

    fn table() -> PriceTable {
        let ts = Utc.with_ymd_and_hms(2018, 3, 9, 14, 30, 0).unwrap();
        vec![PriceBar::new(ts, 1.0, 2.0, 0.5, 1.5, 10.0)].into()
    }

    fn read_gzip(path: &std::path::Path) -> String {
        let mut text = String::new();
        flate2::read::GzDecoder::new(fs::File::open(path).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        text
    }

    #[test]
    fn test_store_creates_directories() {
        let temp = TempDir::new().unwrap();
        let sink = FileSink::new();

        let path = sink.store(&table(), &destination(temp.path())).unwrap();
        assert_eq!(
            path,
            temp.path()
                .join("google_finance/S&P500/index/SPX_2018-03-09.csv.gz")
        );
        assert_eq!(path, sink.path_for(&destination(temp.path())));
        assert_eq!(
            read_gzip(&path),
            "Date;Open;High;Low;Close;Volume\n2018-03-09 14:30:00;1;2;0.5;1.5;10\n"
        );
    }

    #[test]
    fn test_store_overwrites_with_identical_bytes() {
        let temp = TempDir::new().unwrap();
        let sink = FileSink::new();

        let path = sink.store(&table(), &destination(temp.path())).unwrap();
        let first = fs::read(&path).unwrap();
        sink.store(&table(), &destination(temp.path())).unwrap();
        assert_eq!(fs::read(&path).unwrap(), first);

        let entries = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_store_empty_table() {
        let temp = TempDir::new().unwrap();
        let path = FileSink::new()
            .store(&PriceTable::new(), &destination(temp.path()))
            .unwrap();
        assert_eq!(read_gzip(&path), "Date;Open;High;Low;Close;Volume\n");
    }

    #[test]
    fn test_store_uncompressed() {
        let temp = TempDir::new().unwrap();
        let path = FileSink::new()
            .with_compression(Compression::None)
            .store(&table(), &destination(temp.path()))
            .unwrap();
        assert!(path.to_string_lossy().ends_with("SPX_2018-03-09.csv"));
        assert!(fs::read_to_string(&path).unwrap().starts_with("Date;"));
    }

    #[test]
    fn test_failed_write_leaves_no_partial_file() {
        let temp = TempDir::new().unwrap();
        let dest = destination(temp.path());
        let sink = FileSink::new();

        // A non-empty directory at the final path makes the rename fail.
        let target = sink.path_for(&dest);
        fs::create_dir_all(target.join("occupied")).unwrap();

        let err = sink.store(&table(), &dest).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Filesystem);

        let names: Vec<String> = fs::read_dir(dest.directory())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["SPX_2018-03-09.csv.gz"]);
    }

    #[test]
    fn test_unwritable_root_is_filesystem_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        fs::write(&blocker, b"").unwrap();

        let err = FileSink::new()
            .store(&table(), &destination(&blocker))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Filesystem);
    }
}
