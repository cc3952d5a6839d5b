//! Progress and diagnostic reporting.

use std::path::Path;
use std::time::Duration;

use barvault_types::{BarvaultError, DownloadRequest};
use tracing::{info, warn};

use crate::BatchSummary;

/// Line printed when a batch has visited every symbol.
pub const COMPLETION_MARKER: &str = "Done!";

/// Formats the per-symbol progress line. `index` is 1-based.
#[must_use]
pub fn progress_line(index: usize, total: usize, symbol: &str) -> String {
    format!("{index}/{total} = {symbol}")
}

/// Formats the announcement of the next attempt.
#[must_use]
pub fn retry_line(next_attempt: u32, max_attempts: u32) -> String {
    format!("Trying again... try #{next_attempt} of a maximum of {max_attempts}")
}

/// Formats the diagnostic for a symbol whose retries are exhausted.
#[must_use]
pub fn exhausted_line(request: &DownloadRequest) -> String {
    format!(
        "Maximum number of attempts for symbol: {} from {}. Check in path '{}' required.",
        request.symbol(),
        request.provider(),
        request.destination().directory().display()
    )
}

/// Receives the observable events of single fetches and batches.
///
/// Implementations decide where lines go: logs, a terminal, or a buffer in
/// tests.
pub trait BatchReporter: Send + Sync {
    /// Called once before the first symbol. `start` is the 0-based index of
    /// the first symbol visited.
    fn batch_started(&self, total: usize, start: usize) {
        let _ = (total, start);
    }

    /// Called before a symbol is attempted. `index` is 1-based.
    fn progress(&self, index: usize, total: usize, symbol: &str);

    /// Called after every failed attempt.
    fn attempt_failed(
        &self,
        request: &DownloadRequest,
        attempt: u32,
        max_attempts: u32,
        error: &BarvaultError,
    );

    /// Called before waiting for the next attempt.
    fn retry_scheduled(
        &self,
        request: &DownloadRequest,
        next_attempt: u32,
        max_attempts: u32,
        delay: Duration,
    ) {
        let _ = (request, next_attempt, max_attempts, delay);
    }

    /// Called when a table was stored.
    fn stored(&self, request: &DownloadRequest, path: &Path, attempts: u32) {
        let _ = (request, path, attempts);
    }

    /// Called once when a symbol is given up.
    fn exhausted(&self, request: &DownloadRequest, attempts: u32, error: &BarvaultError);

    /// Called after the last symbol of a batch.
    fn completed(&self, summary: &BatchSummary);
}

/// Reports everything through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl BatchReporter for LogReporter {
    fn batch_started(&self, total: usize, start: usize) {
        info!(total, start, "starting batch");
    }

    fn progress(&self, index: usize, total: usize, symbol: &str) {
        info!("{}", progress_line(index, total, symbol));
    }

    fn attempt_failed(
        &self,
        request: &DownloadRequest,
        attempt: u32,
        max_attempts: u32,
        error: &BarvaultError,
    ) {
        warn!(
            symbol = request.symbol(),
            provider = %request.provider(),
            attempt,
            max_attempts,
            kind = %error.kind(),
            "{error}"
        );
    }

    fn retry_scheduled(
        &self,
        _request: &DownloadRequest,
        next_attempt: u32,
        max_attempts: u32,
        delay: Duration,
    ) {
        info!(delay_secs = delay.as_secs_f64(), "{}", retry_line(next_attempt, max_attempts));
    }

    fn stored(&self, request: &DownloadRequest, path: &Path, attempts: u32) {
        info!(symbol = request.symbol(), attempts, path = %path.display(), "stored");
    }

    fn exhausted(&self, request: &DownloadRequest, attempts: u32, error: &BarvaultError) {
        warn!(attempts, last_error = %error, "{}", exhausted_line(request));
    }

    fn completed(&self, summary: &BatchSummary) {
        info!(
            succeeded = summary.succeeded.len(),
            exhausted = summary.exhausted.len(),
            skipped = summary.skipped,
            "{COMPLETION_MARKER}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barvault_types::{Destination, Provider, SourceQuery};

    #[test]
    fn test_progress_line() {
        assert_eq!(progress_line(2, 3, "BBB"), "2/3 = BBB");
    }

    #[test]
    fn test_retry_line() {
        assert_eq!(
            retry_line(2, 10),
            "Trying again... try #2 of a maximum of 10"
        );
    }

    #[test]
    fn test_exhausted_line_names_symbol_provider_and_directory() {
        let request = DownloadRequest::new(
            SourceQuery::new(""),
            Destination::new("/data", Provider::GoogleFinance, "S&P500/symbols", ""),
        )
        .for_symbol("ZZZ");

        assert_eq!(
            exhausted_line(&request),
            "Maximum number of attempts for symbol: ZZZ from google_finance. \
             Check in path '/data/google_finance/S&P500/symbols/ZZZ' required."
        );
    }
}
