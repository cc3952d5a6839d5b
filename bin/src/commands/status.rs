//! Run report status command.

use anyhow::{Context, Result};
use barvault_lib::{BatchRun, StateManager, TaskStatus};

/// Execute the status command.
pub(crate) fn status(state: &StateManager, run_id: Option<&str>, show_all: bool) -> Result<()> {
    #[allow(clippy::option_if_let_else)]
    match run_id {
        Some(id) => show_run_detail(state, id),
        None => list_runs(state, show_all),
    }
}

fn show_run_detail(state: &StateManager, run_id: &str) -> Result<()> {
    let id = run_id.parse().context("Invalid run ID format")?;
    let run = state.load_run(id).context("Run not found")?;
    let template = &run.params.template;

    println!("Run: {}", run.id);
    println!("Status: {}", run.status);
    println!("Provider: {}", template.provider());
    println!("Directory: {}", template.destination().directory().display());
    println!("List: {}", run.params.list_file.display());
    println!(
        "Query: period {} / {} days / {}",
        template.query().period,
        template.query().lookback.as_days(),
        template.query().currency
    );
    println!("Created: {}", run.created_at.format("%Y-%m-%d %H:%M:%S"));

    if let Some(started) = run.started_at {
        println!("Started: {}", started.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(completed) = run.completed_at {
        println!("Completed: {}", completed.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(from) = &run.resumed_from {
        println!("Resumed from: {from}");
    }

    println!("Progress: {:.1}%", run.progress_percent());
    println!(
        "Resume point: {}",
        run.resume_point().unwrap_or("none")
    );

    println!("\nSymbols:");
    for (i, task) in run.tasks.iter().enumerate() {
        if task.status == TaskStatus::Skipped {
            continue;
        }
        println!(
            "  {}. {} [{}] {} attempt(s)",
            i + 1,
            task.symbol,
            task.status,
            task.attempts
        );
        if let Some(ref err) = task.error_message {
            println!("     Error: {err}");
        }
    }

    Ok(())
}

fn is_listed(run: &BatchRun, show_all: bool) -> bool {
    // Default: runs from the last 24h or unfinished ones
    let is_recent = run.created_at > chrono::Utc::now() - chrono::Duration::hours(24);
    show_all || is_recent || !run.is_finished()
}

fn list_runs(state: &StateManager, show_all: bool) -> Result<()> {
    let runs: Vec<BatchRun> = state
        .list_runs()?
        .into_iter()
        .filter(|run| is_listed(run, show_all))
        .collect();

    if runs.is_empty() {
        println!("No runs found.");
        if !show_all {
            println!("Use --all to show all historical runs.");
        }
        return Ok(());
    }

    println!(
        "{:<36} {:<16} {:<24} {:>9} {:<17} {:<8}",
        "RUN ID", "PROVIDER", "STATUS", "PROGRESS", "CREATED", "RESUME"
    );
    println!("{}", "-".repeat(115));

    for run in &runs {
        println!(
            "{:<36} {:<16} {:<24} {:>8.1}% {:<17} {:<8}",
            run.id,
            run.params.template.provider(),
            run.status,
            run.progress_percent(),
            run.created_at.format("%Y-%m-%d %H:%M"),
            run.resume_point().unwrap_or("-"),
        );
    }

    println!("\nTotal: {} runs", runs.len());
    Ok(())
}
