//! Single-symbol fetch command.

use std::path::Path;

use anyhow::{Context, Result};
use barvault_lib::prelude::*;

use crate::display::CliReporter;
use crate::settings::{Pipeline, QueryArgs, RetryArgs};

/// Builds the request for one symbol.
///
/// Catalog instruments default to their catalog category and name; other
/// symbols need an explicit category.
pub(crate) fn build_request(
    root: &Path,
    symbol: &str,
    provider: Provider,
    category: Option<&str>,
    name: Option<&str>,
    query: &SourceQuery,
) -> Result<DownloadRequest> {
    let mut request = match (category, Catalog::global().get(symbol)) {
        (None, Some(entry)) => entry.request(provider, root, query),
        (category, _) => {
            let category = category.with_context(|| {
                format!("{symbol} is not in the catalog: pass --category")
            })?;
            let mut query = query.clone();
            query.symbol = symbol.to_string();
            DownloadRequest::new(query, Destination::new(root, provider, category, symbol))
        }
    };

    if let Some(name) = name {
        request = request.with_name(name);
    }
    Ok(request)
}

/// Fetch one symbol through the retry driver.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn fetch(
    root: &Path,
    symbol: &str,
    provider: Provider,
    category: Option<&str>,
    name: Option<&str>,
    query_args: &QueryArgs,
    retry_args: &RetryArgs,
    quiet: bool,
) -> Result<()> {
    retry_args.require_key_for(&[provider])?;

    let request = build_request(
        root,
        symbol,
        provider,
        category,
        name,
        &query_args.query(symbol)?,
    )?;

    let pipeline = Pipeline::new(retry_args, query_args.compression)?;
    let reporter = CliReporter::new(quiet);
    let driver = pipeline.driver(&reporter);

    match driver.run_with_retry(&request).await {
        RetryOutcome::Succeeded { path, attempts } => {
            if !quiet {
                println!(
                    "{} written to: {} ({attempts} attempt(s))",
                    request.name(),
                    path.display()
                );
            }
            Ok(())
        }
        RetryOutcome::Exhausted { attempts, error } => Err(anyhow::Error::new(error)
            .context(format!("{} failed after {attempts} attempt(s)", request.name()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_catalog_symbol_uses_catalog_category() {
        let request = build_request(
            Path::new("/data"),
            "SPX",
            Provider::GoogleFinance,
            None,
            None,
            &SourceQuery::new("SPX"),
        )
        .unwrap();

        assert_eq!(request.name(), "S&P500");
        assert_eq!(
            request.destination().directory(),
            PathBuf::from("/data/google_finance/S&P500/index")
        );
    }

    #[test]
    fn test_unknown_symbol_needs_category() {
        let query = SourceQuery::new("AAPL");
        assert!(
            build_request(Path::new("/data"), "AAPL", Provider::AlphaVantage, None, None, &query)
                .is_err()
        );

        let request = build_request(
            Path::new("/data"),
            "AAPL",
            Provider::AlphaVantage,
            Some("NASDAQ/stocks"),
            Some("Apple"),
            &query,
        )
        .unwrap();
        assert_eq!(request.symbol(), "AAPL");
        assert_eq!(request.name(), "Apple");
        assert_eq!(request.destination().stem(), "AAPL");
        assert_eq!(
            request.destination().directory(),
            PathBuf::from("/data/alpha_vantage/NASDAQ/stocks")
        );
    }
}
