//! Resume a saved run from its resume point.

use anyhow::{Context, Result};
use barvault_lib::{BatchRun, StateManager, SymbolList};
use inquire::Select;

use crate::commands::batch::run_tracked;
use crate::display::run_line;
use crate::settings::{Pipeline, RetryArgs};

/// Prompt for one of the runs that still have work left.
fn prompt_run_selection(state: &StateManager) -> Result<String> {
    let runs: Vec<BatchRun> = state
        .list_runs()?
        .into_iter()
        .filter(|run| run.resume_point().is_some())
        .collect();

    if runs.is_empty() {
        anyhow::bail!("No runs with unfinished symbols found.");
    }

    let options: Vec<String> = runs.iter().map(run_line).collect();
    let selection = Select::new("Select a run to resume:", options)
        .prompt()
        .context("Run selection cancelled")?;

    let run_id = selection
        .split(" | ")
        .next()
        .context("Failed to parse run selection")?
        .to_string();

    Ok(run_id)
}

/// Start a new run over the same symbols, beginning at the saved run's
/// first unfinished symbol.
pub(crate) async fn resume(
    state: &StateManager,
    run_id: Option<&str>,
    retry_args: &RetryArgs,
    quiet: bool,
) -> Result<()> {
    let id_str = match run_id {
        Some(id) => id.to_string(),
        None => prompt_run_selection(state)?,
    };
    let id = id_str.parse().context("Invalid run ID format")?;
    let previous = state.load_run(id).context("Run not found")?;

    let Some(start) = previous.resume_index() else {
        println!("Run {id} has nothing left to download.");
        return Ok(());
    };

    let template = &previous.params.template;
    retry_args.require_key_for(&[template.provider()])?;

    let symbols: SymbolList = previous.tasks.iter().map(|t| t.symbol.as_str()).collect();
    let params = previous.params.clone();

    if !quiet {
        println!(
            "Resuming run {id} from {} ({}/{})",
            previous.tasks[start].symbol,
            start + 1,
            previous.tasks.len()
        );
    }
    let pipeline = Pipeline::new(retry_args, params.compression)?;
    run_tracked(&pipeline, state, params, &symbols, start, quiet).await?;
    Ok(())
}
