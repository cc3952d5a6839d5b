//! Catalog download command.

use std::path::Path;

use anyhow::Result;
use barvault_lib::prelude::*;

use crate::display::{CliReporter, print_summary};
use crate::settings::{Pipeline, QueryArgs, RetryArgs};

/// Download every catalog instrument, provider by provider.
pub(crate) async fn run_catalog(
    root: &Path,
    provider: Option<Provider>,
    query_args: &QueryArgs,
    retry_args: &RetryArgs,
    quiet: bool,
) -> Result<()> {
    let plan = Catalog::global().plan(provider);
    if plan.is_empty() {
        println!("No catalog instruments for this provider.");
        return Ok(());
    }

    let providers: Vec<Provider> = plan.iter().map(|(p, _)| *p).collect();
    retry_args.require_key_for(&providers)?;

    let query = query_args.query("")?;
    let requests: Vec<DownloadRequest> = plan
        .iter()
        .map(|(provider, entry)| entry.request(*provider, root, &query))
        .collect();

    let pipeline = Pipeline::new(retry_args, query_args.compression)?;
    let reporter = CliReporter::new(quiet);
    let summary = BatchRunner::new(pipeline.driver(&reporter))
        .run_requests(&requests)
        .await;

    if !quiet {
        print_summary(&summary);
    }
    Ok(())
}
