//! Symbol list batch command.

use std::path::Path;

use anyhow::{Context, Result, bail};
use barvault_lib::prelude::*;
use barvault_lib::{BatchRun, RunParams, RunTracker, StateManager};

use crate::display::{CliReporter, print_summary};
use crate::settings::{Pipeline, QueryArgs, RetryArgs};

/// Runs one batch over `symbols` from list position `start`, recorded as a
/// new run report.
///
/// Shared by the batch and resume commands.
pub(crate) async fn run_tracked(
    pipeline: &Pipeline,
    state: &StateManager,
    params: RunParams,
    symbols: &SymbolList,
    start: usize,
    quiet: bool,
) -> Result<BatchSummary> {
    let template = params.template.clone();
    let resumed_from = symbols.as_slice().get(start).filter(|_| start > 0).cloned();
    let run = BatchRun::new(params, symbols, resumed_from);
    if !quiet {
        println!("Run {} ({})", run.id, template.provider());
    }

    let reporter = CliReporter::new(quiet);
    let summary = BatchRunner::new(pipeline.driver(&reporter))
        .with_tracker(RunTracker::new(state.clone(), run))
        .run_batch_at(symbols, start, &template)
        .await?;

    if !quiet {
        print_summary(&summary);
    }
    Ok(summary)
}

/// Download every symbol of a list file, once per provider.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn batch(
    root: &Path,
    state: &StateManager,
    list_file: &Path,
    providers: &[Provider],
    subpath: &str,
    from: Option<&str>,
    delimiter: char,
    query_args: &QueryArgs,
    retry_args: &RetryArgs,
    quiet: bool,
) -> Result<()> {
    if !delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character, got '{delimiter}'");
    }
    retry_args.require_key_for(providers)?;

    let symbols = load_symbol_list(list_file, delimiter as u8)
        .await
        .with_context(|| format!("Failed to load symbol list {}", list_file.display()))?;
    let start = symbols.resume_index(from)?;

    if symbols.is_empty() {
        println!("No symbols in {}.", list_file.display());
        return Ok(());
    }

    let list_file = std::path::absolute(list_file).unwrap_or_else(|_| list_file.to_path_buf());
    let query = query_args.query("")?;
    let pipeline = Pipeline::new(retry_args, query_args.compression)?;

    let mut given_up = 0;
    for &provider in providers {
        let params = RunParams {
            list_file: list_file.clone(),
            delimiter,
            compression: query_args.compression,
            template: DownloadRequest::new(
                query.clone(),
                Destination::new(root, provider, subpath, ""),
            ),
        };
        let summary = run_tracked(&pipeline, state, params, &symbols, start, quiet).await?;
        given_up += summary.exhausted.len();
    }

    if given_up > 0 && !quiet {
        println!("{given_up} symbol(s) need attention; see `barvault status` and `barvault resume`.");
    }
    Ok(())
}
