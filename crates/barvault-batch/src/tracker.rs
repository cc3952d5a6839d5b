//! Run report bookkeeping during a batch.

use std::path::PathBuf;

use barvault_types::BarvaultError;
use tracing::warn;

use crate::{BatchRun, StateManager, TaskStatus};

/// Records per-symbol outcomes into a [`BatchRun`] and saves it after each step.
///
/// A failed save is logged and does not interrupt the batch; the report is
/// bookkeeping, not part of the download contract.
#[derive(Debug)]
pub struct RunTracker {
    state: StateManager,
    run: BatchRun,
}

impl RunTracker {
    /// Creates a tracker for `run`.
    #[must_use]
    pub const fn new(state: StateManager, run: BatchRun) -> Self {
        Self { state, run }
    }

    /// Returns the run being tracked.
    #[must_use]
    pub const fn run(&self) -> &BatchRun {
        &self.run
    }

    /// Consumes the tracker and returns the run.
    #[must_use]
    pub fn into_run(self) -> BatchRun {
        self.run
    }

    /// Marks the run as started and the first `skipped` tasks as skipped.
    pub fn start(&mut self, skipped: usize) {
        self.run.mark_started();
        for task in self.run.tasks.iter_mut().take(skipped) {
            task.status = TaskStatus::Skipped;
        }
        self.checkpoint();
    }

    /// Marks a task as running.
    pub fn symbol_running(&mut self, index: usize) {
        if let Some(task) = self.run.tasks.get_mut(index) {
            task.status = TaskStatus::Running;
        }
        self.checkpoint();
    }

    /// Marks a task as stored.
    pub fn symbol_completed(&mut self, index: usize, path: PathBuf, attempts: u32) {
        if let Some(task) = self.run.tasks.get_mut(index) {
            task.status = TaskStatus::Completed;
            task.attempts = attempts;
            task.output_path = Some(path);
            task.error_message = None;
        }
        self.checkpoint();
    }

    /// Marks a task as failed with the last error.
    pub fn symbol_failed(&mut self, index: usize, error: &BarvaultError, attempts: u32) {
        if let Some(task) = self.run.tasks.get_mut(index) {
            task.status = TaskStatus::Failed;
            task.attempts = attempts;
            task.error_message = Some(error.to_string());
        }
        self.checkpoint();
    }

    /// Marks the run as finished.
    pub fn finish(&mut self) {
        self.run.mark_finished();
        self.checkpoint();
    }

    fn checkpoint(&self) {
        if let Err(e) = self.state.save_run(&self.run) {
            warn!(run = %self.run.id, error = %e, "failed to save run report");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RunStatus;
    use crate::testing::test_run;
    use barvault_types::Provider;
    use tempfile::TempDir;

    #[test]
    fn test_tracker_persists_each_step() {
        let temp = TempDir::new().unwrap();
        let state = StateManager::new(temp.path().to_path_buf()).unwrap();
        let run = test_run(&["AAA", "BBB", "CCC"]);
        let id = run.id;
        let mut tracker = RunTracker::new(state.clone(), run);

        tracker.start(1);
        let saved = state.load_run(id).unwrap();
        assert_eq!(saved.status, RunStatus::Running);
        assert_eq!(saved.tasks[0].status, TaskStatus::Skipped);

        tracker.symbol_running(1);
        tracker.symbol_completed(1, PathBuf::from("/out/BBB.csv.gz"), 2);
        tracker.symbol_running(2);
        assert_eq!(state.load_run(id).unwrap().resume_point(), Some("CCC"));

        let err = BarvaultError::upstream(Provider::GoogleFinance, "HTTP 503");
        tracker.symbol_failed(2, &err, 10);
        tracker.finish();

        let saved = state.load_run(id).unwrap();
        assert_eq!(saved.status, RunStatus::CompletedWithFailures);
        assert_eq!(saved.tasks[1].attempts, 2);
        assert_eq!(saved.tasks[2].attempts, 10);
        assert!(saved.tasks[2].error_message.as_deref().unwrap().contains("503"));
        assert_eq!(saved.resume_point(), Some("CCC"));
    }

    #[test]
    fn test_save_failure_does_not_panic() {
        let temp = TempDir::new().unwrap();
        let state = StateManager::new(temp.path().to_path_buf()).unwrap();
        std::fs::remove_dir_all(temp.path().join("runs")).unwrap();

        let mut tracker = RunTracker::new(state, test_run(&["AAA"]));
        tracker.start(0);
        tracker.finish();
        assert_eq!(tracker.run().status, RunStatus::Completed);
    }
}
