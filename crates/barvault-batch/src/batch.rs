//! Resumable iteration over a symbol list.

use barvault_types::{BarvaultError, DownloadRequest, Result, SymbolList};
use serde::{Deserialize, Serialize};

use crate::{RetryDriver, RetryOutcome, RunTracker};

/// Totals of a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of symbols in the list.
    pub total: usize,
    /// Number of symbols before the resume point.
    pub skipped: usize,
    /// Symbols that were stored, in visiting order.
    pub succeeded: Vec<String>,
    /// Symbols whose retries were exhausted, in visiting order.
    pub exhausted: Vec<String>,
}

impl BatchSummary {
    /// Returns true if no visited symbol was given up.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.exhausted.is_empty()
    }

    /// Returns the number of symbols visited.
    #[must_use]
    pub fn visited(&self) -> usize {
        self.succeeded.len() + self.exhausted.len()
    }
}

/// Visits every symbol from a resume point to the end of a list.
///
/// Each symbol gets the full retry budget. A symbol that exhausts it is
/// reported and the batch moves on.
#[derive(Debug)]
pub struct BatchRunner<'a> {
    driver: RetryDriver<'a>,
    tracker: Option<RunTracker>,
}

impl<'a> BatchRunner<'a> {
    /// Creates a runner without a run report.
    #[must_use]
    pub const fn new(driver: RetryDriver<'a>) -> Self {
        Self {
            driver,
            tracker: None,
        }
    }

    /// Records the batch into a run report.
    #[must_use]
    pub fn with_tracker(mut self, tracker: RunTracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Returns the run tracker, if any.
    #[must_use]
    pub const fn tracker(&self) -> Option<&RunTracker> {
        self.tracker.as_ref()
    }

    /// Consumes the runner and returns the run tracker, if any.
    #[must_use]
    pub fn into_tracker(self) -> Option<RunTracker> {
        self.tracker
    }

    /// Downloads every symbol of `symbols` from `resume_from` onwards.
    ///
    /// Requests are derived from `template` with
    /// [`DownloadRequest::for_symbol`]. Progress lines number symbols
    /// against the whole list, so a resumed run starts above `1`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error, before any download, if `resume_from`
    /// is not in the list. Per-symbol failures are not errors.
    pub async fn run_batch(
        &mut self,
        symbols: &SymbolList,
        resume_from: Option<&str>,
        template: &DownloadRequest,
    ) -> Result<BatchSummary> {
        let start = symbols.resume_index(resume_from)?;
        self.run_batch_at(symbols, start, template).await
    }

    /// Downloads every symbol of `symbols` from list position `start` onwards.
    ///
    /// Used to resume a saved run, whose resume point is a position rather
    /// than a symbol when the list repeats symbols.
    ///
    /// # Errors
    ///
    /// Returns a configuration error, before any download, if `start` lies
    /// past the end of the list.
    pub async fn run_batch_at(
        &mut self,
        symbols: &SymbolList,
        start: usize,
        template: &DownloadRequest,
    ) -> Result<BatchSummary> {
        if start > symbols.len() {
            return Err(BarvaultError::Config(format!(
                "resume position {start} is past the end of a {}-symbol list",
                symbols.len()
            )));
        }
        let requests: Vec<DownloadRequest> = symbols
            .iter()
            .map(|symbol| template.for_symbol(symbol))
            .collect();
        Ok(self.visit(&requests, start).await)
    }

    /// Downloads a prepared list of requests in order, starting at the first.
    pub async fn run_requests(&mut self, requests: &[DownloadRequest]) -> BatchSummary {
        self.visit(requests, 0).await
    }

    async fn visit(&mut self, requests: &[DownloadRequest], start: usize) -> BatchSummary {
        let total = requests.len();
        let reporter = self.driver.reporter();
        let mut summary = BatchSummary {
            total,
            skipped: start,
            ..BatchSummary::default()
        };

        reporter.batch_started(total, start);
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.start(start);
        }

        for (index, request) in requests.iter().enumerate().skip(start) {
            reporter.progress(index + 1, total, request.symbol());
            if let Some(tracker) = self.tracker.as_mut() {
                tracker.symbol_running(index);
            }

            match self.driver.run_with_retry(request).await {
                RetryOutcome::Succeeded { path, attempts } => {
                    if let Some(tracker) = self.tracker.as_mut() {
                        tracker.symbol_completed(index, path, attempts);
                    }
                    summary.succeeded.push(request.symbol().to_string());
                }
                RetryOutcome::Exhausted { attempts, error } => {
                    if let Some(tracker) = self.tracker.as_mut() {
                        tracker.symbol_failed(index, &error, attempts);
                    }
                    summary.exhausted.push(request.symbol().to_string());
                }
            }
        }

        if let Some(tracker) = self.tracker.as_mut() {
            tracker.finish();
        }
        reporter.completed(&summary);
        summary
    }
}
