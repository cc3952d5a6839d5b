//! Bounded retry around a single fetch-and-store.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use barvault_types::{BarvaultError, DownloadRequest, ErrorKind};
use tracing::debug;

use crate::{BatchReporter, FetchAndStore};

/// How many attempts are made and which failures are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
    retryable: BTreeMap<ErrorKind, bool>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            delay: Self::DEFAULT_DELAY,
            retryable: ErrorKind::all()
                .iter()
                .map(|kind| (*kind, !matches!(kind, ErrorKind::Config)))
                .collect(),
        }
    }
}

impl RetryPolicy {
    /// Default total number of attempts per symbol.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

    /// Default wait between attempts.
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);

    /// Sets the total number of attempts. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Sets the wait between attempts.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets whether failures of `kind` are retried.
    #[must_use]
    pub fn with_retryable(mut self, kind: ErrorKind, retryable: bool) -> Self {
        self.retryable.insert(kind, retryable);
        self
    }

    /// Returns the total number of attempts.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the wait between attempts.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns true if a failure of `kind` is retried.
    #[must_use]
    pub fn is_retryable(&self, kind: ErrorKind) -> bool {
        self.retryable.get(&kind).copied().unwrap_or(false)
    }
}

/// Result of driving one request to completion.
#[derive(Debug)]
pub enum RetryOutcome {
    /// The table was stored.
    Succeeded {
        /// File written.
        path: PathBuf,
        /// Attempts made, including the successful one.
        attempts: u32,
    },
    /// Every allowed attempt failed, or a failure was not retryable.
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Error of the last attempt.
        error: BarvaultError,
    },
}

impl RetryOutcome {
    /// Returns true if the table was stored.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Returns the number of attempts made.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Succeeded { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }
}

/// Runs [`FetchAndStore`] until it succeeds or the policy gives up.
#[derive(Clone, Copy)]
pub struct RetryDriver<'a> {
    pipeline: FetchAndStore<'a>,
    policy: &'a RetryPolicy,
    reporter: &'a dyn BatchReporter,
}

impl std::fmt::Debug for RetryDriver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryDriver")
            .field("pipeline", &self.pipeline)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<'a> RetryDriver<'a> {
    /// Creates a driver.
    #[must_use]
    pub const fn new(
        pipeline: FetchAndStore<'a>,
        policy: &'a RetryPolicy,
        reporter: &'a dyn BatchReporter,
    ) -> Self {
        Self {
            pipeline,
            policy,
            reporter,
        }
    }

    /// Returns the reporter events are sent to.
    #[must_use]
    pub const fn reporter(&self) -> &'a dyn BatchReporter {
        self.reporter
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn policy(&self) -> &'a RetryPolicy {
        self.policy
    }

    /// Attempts `request` until it succeeds or the policy gives up.
    ///
    /// Every failure is reported. Between attempts the driver waits for the
    /// policy delay. On giving up, one exhausted diagnostic is reported and
    /// the outcome returned; giving up is not an error.
    pub async fn run_with_retry(&self, request: &DownloadRequest) -> RetryOutcome {
        let max_attempts = self.policy.max_attempts();
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(symbol = request.symbol(), attempt = attempts, "attempting download");

            let error = match self.pipeline.run(request).await {
                Ok(path) => {
                    self.reporter.stored(request, &path, attempts);
                    return RetryOutcome::Succeeded { path, attempts };
                }
                Err(error) => error,
            };

            self.reporter
                .attempt_failed(request, attempts, max_attempts, &error);

            if attempts >= max_attempts || !self.policy.is_retryable(error.kind()) {
                self.reporter.exhausted(request, attempts, &error);
                return RetryOutcome::Exhausted { attempts, error };
            }

            self.reporter
                .retry_scheduled(request, attempts + 1, max_attempts, self.policy.delay());
            tokio::time::sleep(self.policy.delay()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSource, RecordingReporter, request, sample_table};
    use barvault_fetch::SourceRegistry;
    use barvault_format::FileSink;
    use barvault_types::Provider;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn policy() -> RetryPolicy {
        RetryPolicy::default().with_delay(Duration::ZERO)
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 10);
        assert_eq!(policy.delay(), Duration::from_secs(5));
        assert!(policy.is_retryable(ErrorKind::Upstream));
        assert!(policy.is_retryable(ErrorKind::MalformedAnchor));
        assert!(policy.is_retryable(ErrorKind::Filesystem));
        assert!(!policy.is_retryable(ErrorKind::Config));
        assert_eq!(RetryPolicy::default().with_max_attempts(0).max_attempts(), 1);
    }

    #[tokio::test]
    async fn test_success_after_failures() {
        let temp = TempDir::new().unwrap();
        let source = FakeSource::new(Provider::GoogleFinance, sample_table()).failing(2);
        let registry = SourceRegistry::new().with_source(Arc::new(source));
        let sink = FileSink::new();
        let reporter = RecordingReporter::default();
        let policy = policy();

        let driver = RetryDriver::new(FetchAndStore::new(&registry, &sink), &policy, &reporter);
        let outcome = driver.run_with_retry(&request(temp.path(), "SPX")).await;

        match outcome {
            RetryOutcome::Succeeded { path, attempts } => {
                assert_eq!(attempts, 3);
                assert!(path.exists());
            }
            RetryOutcome::Exhausted { error, .. } => panic!("unexpected failure: {error}"),
        }
        assert_eq!(reporter.count("failed"), 2);
        assert_eq!(
            reporter.lines_with("Trying again"),
            [
                "Trying again... try #2 of a maximum of 10",
                "Trying again... try #3 of a maximum of 10"
            ]
        );
        assert_eq!(reporter.count("exhausted"), 0);
    }

    #[tokio::test]
    async fn test_exhausts_after_max_attempts() {
        let temp = TempDir::new().unwrap();
        let source = Arc::new(FakeSource::new(Provider::GoogleFinance, sample_table()).failing(u32::MAX));
        let registry = SourceRegistry::new().with_source(source.clone());
        let sink = FileSink::new();
        let reporter = RecordingReporter::default();
        let policy = policy();

        let driver = RetryDriver::new(FetchAndStore::new(&registry, &sink), &policy, &reporter);
        let outcome = driver.run_with_retry(&request(temp.path(), "ZZZ")).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.attempts(), 10);
        assert_eq!(source.calls(), 10);
        assert_eq!(reporter.count("failed"), 10);
        assert_eq!(reporter.lines_with("Trying again").len(), 9);
        assert_eq!(reporter.count("exhausted"), 1);

        let exhausted = reporter.lines_with("Maximum number of attempts");
        assert_eq!(exhausted.len(), 1);
        assert!(exhausted[0].contains("ZZZ"));
        assert!(exhausted[0].contains("google_finance"));
        assert!(exhausted[0].contains(&temp.path().join("google_finance/S&P500/symbols/ZZZ").display().to_string()));
        assert!(!temp.path().join("google_finance").exists());
    }

    #[tokio::test]
    async fn test_config_error_is_not_retried() {
        let temp = TempDir::new().unwrap();
        let registry = SourceRegistry::new();
        let sink = FileSink::new();
        let reporter = RecordingReporter::default();
        let policy = policy();

        let driver = RetryDriver::new(FetchAndStore::new(&registry, &sink), &policy, &reporter);
        let outcome = driver.run_with_retry(&request(temp.path(), "SPX")).await;

        match outcome {
            RetryOutcome::Exhausted { attempts, error } => {
                assert_eq!(attempts, 1);
                assert_eq!(error.kind(), ErrorKind::Config);
            }
            RetryOutcome::Succeeded { .. } => panic!("expected failure"),
        }
        assert_eq!(reporter.count("exhausted"), 1);
    }

    #[tokio::test]
    async fn test_malformed_anchor_follows_policy() {
        let temp = TempDir::new().unwrap();
        let source = Arc::new(
            FakeSource::new(Provider::GoogleFinance, sample_table())
                .failing(u32::MAX)
                .with_error(|| BarvaultError::MalformedAnchor { line: 8 }),
        );
        let registry = SourceRegistry::new().with_source(source.clone());
        let sink = FileSink::new();
        let reporter = RecordingReporter::default();
        let policy = policy()
            .with_max_attempts(3)
            .with_retryable(ErrorKind::MalformedAnchor, false);

        let driver = RetryDriver::new(FetchAndStore::new(&registry, &sink), &policy, &reporter);
        let outcome = driver.run_with_retry(&request(temp.path(), "SPX")).await;

        assert_eq!(outcome.attempts(), 1);
        assert_eq!(source.calls(), 1);
    }
}
