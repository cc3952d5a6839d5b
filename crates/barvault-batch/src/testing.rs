//! Scripted sources and reporters for unit tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use barvault_fetch::TableSource;
use barvault_format::Compression;
use barvault_types::{
    BarvaultError, Destination, DownloadRequest, PriceBar, PriceTable, Provider, Result,
    SourceQuery, SymbolList,
};
use chrono::{NaiveDate, TimeZone, Utc};

use crate::report::{exhausted_line, progress_line, retry_line};
use crate::{BatchReporter, BatchRun, BatchSummary, COMPLETION_MARKER, RunParams};

pub(crate) fn sample_table() -> PriceTable {
    let ts = Utc.with_ymd_and_hms(2018, 3, 9, 14, 30, 0).unwrap();
    vec![PriceBar::new(ts, 1.0, 2.0, 0.5, 1.5, 10.0)].into()
}

pub(crate) fn template(root: &Path) -> DownloadRequest {
    DownloadRequest::new(
        SourceQuery::new(""),
        Destination::new(root, Provider::GoogleFinance, "S&P500/symbols", ""),
    )
    .with_date(NaiveDate::from_ymd_opt(2018, 3, 9).unwrap())
}

pub(crate) fn request(root: &Path, symbol: &str) -> DownloadRequest {
    template(root).for_symbol(symbol)
}

pub(crate) fn test_run(symbols: &[&str]) -> BatchRun {
    let params = RunParams {
        list_file: PathBuf::from("/tmp/SPX_list.csv"),
        delimiter: ';',
        compression: Compression::Gzip,
        template: template(Path::new("/tmp/data")),
    };
    BatchRun::new(params, &SymbolList::new(symbols.iter().copied()), None)
}

pub(crate) fn read_gzip(path: &Path) -> String {
    use std::io::Read;

    let mut text = String::new();
    flate2::read::GzDecoder::new(std::fs::File::open(path).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    text
}

/// Source returning a fixed table after a scripted number of failures.
#[derive(Debug)]
pub(crate) struct FakeSource {
    provider: Provider,
    table: PriceTable,
    failures_left: Mutex<u32>,
    failing_symbol: Option<String>,
    error: fn() -> BarvaultError,
    fetched: Mutex<Vec<String>>,
}

impl FakeSource {
    pub(crate) fn new(provider: Provider, table: PriceTable) -> Self {
        Self {
            provider,
            table,
            failures_left: Mutex::new(0),
            failing_symbol: None,
            error: || BarvaultError::upstream(Provider::GoogleFinance, "scripted failure"),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Fails the next `count` calls.
    pub(crate) fn failing(self, count: u32) -> Self {
        *self.failures_left.lock().unwrap() = count;
        self
    }

    /// Always fails for `symbol`.
    pub(crate) fn failing_for(mut self, symbol: &str) -> Self {
        self.failing_symbol = Some(symbol.to_string());
        self
    }

    pub(crate) fn with_error(mut self, error: fn() -> BarvaultError) -> Self {
        self.error = error;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.fetched.lock().unwrap().len()
    }

    /// Symbols fetched, one entry per call.
    pub(crate) fn symbols(&self) -> Vec<String> {
        let mut symbols = self.fetched.lock().unwrap().clone();
        symbols.dedup();
        symbols
    }
}

#[async_trait]
impl TableSource for FakeSource {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn fetch(&self, query: &SourceQuery) -> Result<PriceTable> {
        self.fetched.lock().unwrap().push(query.symbol.clone());

        if self.failing_symbol.as_deref() == Some(query.symbol.as_str()) {
            return Err((self.error)());
        }

        let mut left = self.failures_left.lock().unwrap();
        if *left > 0 {
            *left -= 1;
            return Err((self.error)());
        }
        Ok(self.table.clone())
    }
}

/// Reporter that keeps every event as a tagged line.
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    events: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingReporter {
    fn push(&self, tag: &'static str, line: String) {
        self.events.lock().unwrap().push((tag, line));
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, line)| line.clone())
            .collect()
    }

    pub(crate) fn lines_with(&self, needle: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.contains(needle))
            .collect()
    }

    pub(crate) fn count(&self, tag: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| *t == tag)
            .count()
    }
}

impl BatchReporter for RecordingReporter {
    fn progress(&self, index: usize, total: usize, symbol: &str) {
        self.push("progress", progress_line(index, total, symbol));
    }

    fn attempt_failed(
        &self,
        request: &DownloadRequest,
        attempt: u32,
        max_attempts: u32,
        error: &BarvaultError,
    ) {
        self.push(
            "failed",
            format!("{} attempt {attempt}/{max_attempts}: {error}", request.symbol()),
        );
    }

    fn retry_scheduled(
        &self,
        _request: &DownloadRequest,
        next_attempt: u32,
        max_attempts: u32,
        _delay: Duration,
    ) {
        self.push("retry", retry_line(next_attempt, max_attempts));
    }

    fn stored(&self, request: &DownloadRequest, _path: &Path, attempts: u32) {
        self.push("stored", format!("stored {} after {attempts}", request.symbol()));
    }

    fn exhausted(&self, request: &DownloadRequest, _attempts: u32, _error: &BarvaultError) {
        self.push("exhausted", exhausted_line(request));
    }

    fn completed(&self, _summary: &BatchSummary) {
        self.push("completed", COMPLETION_MARKER.to_string());
    }
}
