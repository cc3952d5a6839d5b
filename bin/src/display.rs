//! Terminal output for the barvault CLI.

use std::io::{self, Stdout, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use barvault_lib::prelude::*;
use barvault_lib::report::{exhausted_line, progress_line, retry_line};
use barvault_lib::{BatchRun, COMPLETION_MARKER};
use indicatif::{ProgressBar, ProgressStyle};

/// Prints progress lines and the completion marker to `out` (stdout by
/// default) above an `indicatif` bar, and diagnostics to stderr.
///
/// Lines are written whether or not the bar is drawn, so redirected output
/// keeps them.
#[derive(Debug)]
pub(crate) struct CliReporter<W = Stdout> {
    bar: ProgressBar,
    quiet: bool,
    out: Mutex<W>,
}

impl CliReporter {
    pub(crate) fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(0);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} symbols {msg}")
                    .expect("Invalid progress template")
                    .progress_chars("=>-"),
            );
            pb
        };
        Self::with_output(bar, quiet, io::stdout())
    }
}

impl<W: Write + Send> CliReporter<W> {
    pub(crate) const fn with_output(bar: ProgressBar, quiet: bool, out: W) -> Self {
        Self {
            bar,
            quiet,
            out: Mutex::new(out),
        }
    }

    fn line(&self, line: &str) {
        if self.quiet {
            return;
        }
        self.bar.suspend(|| {
            if let Ok(mut out) = self.out.lock() {
                let _ = writeln!(out, "{line}");
                let _ = out.flush();
            }
        });
    }

    fn diagnostic(&self, line: &str) {
        self.bar.suspend(|| eprintln!("{line}"));
    }
}

impl<W: Write + Send> BatchReporter for CliReporter<W> {
    fn batch_started(&self, total: usize, start: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(start as u64);
    }

    fn progress(&self, index: usize, total: usize, symbol: &str) {
        self.line(&progress_line(index, total, symbol));
        self.bar.set_message(symbol.to_string());
    }

    fn attempt_failed(
        &self,
        request: &DownloadRequest,
        attempt: u32,
        max_attempts: u32,
        error: &BarvaultError,
    ) {
        self.diagnostic(&format!(
            "{} attempt {attempt}/{max_attempts} failed: {error}",
            request.symbol()
        ));
    }

    fn retry_scheduled(
        &self,
        _request: &DownloadRequest,
        next_attempt: u32,
        max_attempts: u32,
        _delay: Duration,
    ) {
        self.diagnostic(&retry_line(next_attempt, max_attempts));
    }

    fn stored(&self, _request: &DownloadRequest, path: &Path, _attempts: u32) {
        tracing::debug!(path = %path.display(), "stored");
        self.bar.inc(1);
    }

    fn exhausted(&self, request: &DownloadRequest, _attempts: u32, _error: &BarvaultError) {
        self.diagnostic(&exhausted_line(request));
        self.bar.inc(1);
    }

    fn completed(&self, _summary: &BatchSummary) {
        self.bar.finish_and_clear();
        self.line(COMPLETION_MARKER);
    }
}

/// Prints the totals of a batch.
pub(crate) fn print_summary(summary: &BatchSummary) {
    println!(
        "Stored {} of {} symbols ({} skipped, {} given up)",
        summary.succeeded.len(),
        summary.total,
        summary.skipped,
        summary.exhausted.len()
    );
    if !summary.exhausted.is_empty() {
        println!("Given up: {}", summary.exhausted.join(", "));
    }
}

/// Shortens a symbol list to its first three entries.
pub(crate) fn symbols_preview<'a>(symbols: impl IntoIterator<Item = &'a str>) -> String {
    let symbols: Vec<&str> = symbols.into_iter().collect();
    if symbols.len() > 3 {
        format!("{}, ... (+{} more)", symbols[..3].join(", "), symbols.len() - 3)
    } else {
        symbols.join(", ")
    }
}

/// One-line description of a run for tables and selection prompts.
pub(crate) fn run_line(run: &BatchRun) -> String {
    format!(
        "{} | {} | {} | {:.1}% | {}",
        run.id,
        run.params.template.provider(),
        run.status,
        run.progress_percent(),
        symbols_preview(run.tasks.iter().map(|t| t.symbol.as_str()))
    )
}
