//! Command-line options shared by the download commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use barvault_lib::prelude::*;
use barvault_lib::{RetryDriver, StateManager};
use clap::Args;

/// What to ask the provider for and how to store it.
#[derive(Debug, Clone, Args)]
pub(crate) struct QueryArgs {
    /// Sampling period (60, 5m, 15m, 1h, ...)
    #[arg(long, default_value = "60")]
    pub(crate) period: SamplingPeriod,

    /// Days of history to request
    #[arg(long, default_value_t = LookbackWindow::DEFAULT_DAYS, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) days: u32,

    /// Quote currency or exchange tag
    #[arg(long, default_value = SourceQuery::DEFAULT_CURRENCY)]
    pub(crate) currency: String,

    /// Output compression (gzip, xz, none)
    #[arg(long, default_value = "gzip")]
    pub(crate) compression: Compression,

    /// Log every request URL
    #[arg(long)]
    pub(crate) debug: bool,
}

impl QueryArgs {
    /// Builds the query template; the symbol is filled in per request.
    pub(crate) fn query(&self, symbol: &str) -> Result<SourceQuery> {
        let lookback = LookbackWindow::days(self.days).context("--days must be at least 1")?;
        Ok(SourceQuery::new(symbol)
            .with_period(self.period)
            .with_lookback(lookback)
            .with_currency(&self.currency)
            .with_debug(self.debug))
    }
}

/// Retry budget and provider credentials.
#[derive(Debug, Clone, Args)]
pub(crate) struct RetryArgs {
    /// Total attempts per symbol
    #[arg(long, default_value_t = RetryPolicy::DEFAULT_MAX_ATTEMPTS, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) max_attempts: u32,

    /// Seconds to wait between attempts
    #[arg(long, default_value_t = RetryPolicy::DEFAULT_DELAY.as_secs())]
    pub(crate) retry_delay: u64,

    /// Alpha Vantage API key
    #[arg(long, env = "ALPHA_VANTAGE_API_KEY", hide_env_values = true)]
    pub(crate) api_key: Option<String>,
}

impl RetryArgs {
    pub(crate) fn policy(&self) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_attempts(self.max_attempts)
            .with_delay(Duration::from_secs(self.retry_delay))
    }

    /// Fails early when a provider needs a key that was not given.
    pub(crate) fn require_key_for(&self, providers: &[Provider]) -> Result<()> {
        if self.api_key.is_some() {
            return Ok(());
        }
        if let Some(provider) = providers.iter().find(|p| p.requires_api_key()) {
            bail!(
                "{} requires an API key: pass --api-key or set ALPHA_VANTAGE_API_KEY",
                provider.display_name()
            );
        }
        Ok(())
    }
}

/// Sources, sink and retry policy for one command invocation.
#[derive(Debug)]
pub(crate) struct Pipeline {
    sources: SourceRegistry,
    sink: FileSink,
    policy: RetryPolicy,
}

impl Pipeline {
    pub(crate) fn new(retry: &RetryArgs, compression: Compression) -> Result<Self> {
        let config = FetchConfig::default().with_api_key(retry.api_key.clone());
        let sources =
            SourceRegistry::from_config(&config).context("Failed to create provider sources")?;

        Ok(Self {
            sources,
            sink: FileSink::new().with_compression(compression),
            policy: retry.policy(),
        })
    }

    pub(crate) fn driver<'a>(&'a self, reporter: &'a dyn BatchReporter) -> RetryDriver<'a> {
        RetryDriver::new(
            FetchAndStore::new(&self.sources, &self.sink),
            &self.policy,
            reporter,
        )
    }
}

/// Returns the output root, defaulting to `<data dir>/warehouse`.
pub(crate) fn output_root(root: Option<&Path>) -> PathBuf {
    root.map_or_else(
        || StateManager::default_path().join("warehouse"),
        Path::to_path_buf,
    )
}

/// Opens the run report store.
pub(crate) fn open_state(state_dir: Option<&Path>) -> Result<StateManager> {
    let path = state_dir.map_or_else(StateManager::default_path, Path::to_path_buf);
    StateManager::new(path).context("Failed to initialize state manager")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retry_args(api_key: Option<&str>) -> RetryArgs {
        RetryArgs {
            max_attempts: 3,
            retry_delay: 0,
            api_key: api_key.map(String::from),
        }
    }

    #[test]
    fn test_query_from_args() {
        let args = QueryArgs {
            period: SamplingPeriod::from_seconds(300).unwrap(),
            days: 5,
            currency: "EUR".into(),
            compression: Compression::Gzip,
            debug: true,
        };
        let query = args.query("SPY").unwrap();
        assert_eq!(query.symbol, "SPY");
        assert_eq!(query.period.seconds(), 300);
        assert_eq!(query.lookback.as_days(), 5);
        assert_eq!(query.currency, "EUR");
        assert!(query.debug);
    }

    #[test]
    fn test_policy_from_args() {
        let policy = retry_args(None).policy();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay(), Duration::ZERO);
    }

    #[test]
    fn test_require_key() {
        assert!(retry_args(None).require_key_for(&[Provider::GoogleFinance]).is_ok());
        assert!(retry_args(None).require_key_for(&[Provider::AlphaVantage]).is_err());
        assert!(retry_args(Some("demo")).require_key_for(Provider::all()).is_ok());
    }

    #[test]
    fn test_output_root() {
        assert_eq!(
            output_root(Some(Path::new("/data"))),
            PathBuf::from("/data")
        );
        assert!(output_root(None).ends_with("warehouse"));
    }
}
