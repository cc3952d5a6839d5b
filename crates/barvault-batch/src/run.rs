//! Batch run reports.

use barvault_format::Compression;
use barvault_types::{DownloadRequest, SymbolList};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Unique identifier for a batch run.
pub type RunId = Uuid;

/// Status of a single symbol within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not attempted yet.
    #[default]
    Pending,
    /// Being downloaded.
    Running,
    /// Stored successfully.
    Completed,
    /// Gave up after the retry budget was spent.
    Failed,
    /// Before the resume point; never attempted in this run.
    Skipped,
}

impl TaskStatus {
    /// Returns true if the task will not change any more in this run.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Skipped)
    }

    /// Returns the status as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Created but not started.
    #[default]
    Pending,
    /// Iterating over symbols.
    Running,
    /// Every attempted symbol was stored.
    Completed,
    /// Finished, but at least one symbol exhausted its retries.
    CompletedWithFailures,
}

impl RunStatus {
    /// Returns true if the run reached its end.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::CompletedWithFailures)
    }

    /// Returns the status as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::CompletedWithFailures => "completed_with_failures",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything needed to repeat or resume a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParams {
    /// Symbol list file.
    pub list_file: PathBuf,
    /// Delimiter of the symbol list file.
    pub delimiter: char,
    /// Output compression.
    pub compression: Compression,
    /// Request every symbol's request is derived from.
    pub template: DownloadRequest,
}

/// Record of one symbol within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolTask {
    /// Symbol.
    pub symbol: String,
    /// Current status.
    pub status: TaskStatus,
    /// Attempts made.
    pub attempts: u32,
    /// File written on success.
    pub output_path: Option<PathBuf>,
    /// Last error if the symbol failed.
    pub error_message: Option<String>,
}

impl SymbolTask {
    /// Creates a pending task.
    #[must_use]
    pub const fn new(symbol: String) -> Self {
        Self {
            symbol,
            status: TaskStatus::Pending,
            attempts: 0,
            output_path: None,
            error_message: None,
        }
    }
}

/// A batch run over one symbol list and one provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRun {
    /// Unique identifier for this run.
    pub id: RunId,
    /// Timestamp when the run was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the run started.
    pub started_at: Option<DateTime<Utc>>,
    /// Timestamp when the run finished.
    pub completed_at: Option<DateTime<Utc>>,
    /// Current status.
    pub status: RunStatus,
    /// Symbol the run was resumed from, if any.
    pub resumed_from: Option<String>,
    /// Run parameters.
    pub params: RunParams,
    /// One task per symbol, in list order.
    pub tasks: Vec<SymbolTask>,
}

impl BatchRun {
    /// Creates a pending run with one task per symbol.
    #[must_use]
    pub fn new(params: RunParams, symbols: &SymbolList, resumed_from: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            status: RunStatus::Pending,
            resumed_from,
            params,
            tasks: symbols
                .iter()
                .map(|symbol| SymbolTask::new(symbol.to_string()))
                .collect(),
        }
    }

    /// Returns true if the run reached its end.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Returns the number of tasks with the given status.
    #[must_use]
    pub fn count(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }

    /// Returns the percentage of tasks that are finished.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if self.tasks.is_empty() {
            return 0.0;
        }
        let finished = self.tasks.iter().filter(|t| t.status.is_finished()).count();
        (finished as f64 / self.tasks.len() as f64) * 100.0
    }

    /// Returns the list position a follow-up run should resume from.
    ///
    /// This is the first task that was neither stored nor skipped: a failed
    /// symbol, or the one a crash interrupted. `None` means there is nothing
    /// left to do. Positions stay exact when a symbol appears more than once.
    #[must_use]
    pub fn resume_index(&self) -> Option<usize> {
        self.tasks
            .iter()
            .position(|t| !matches!(t.status, TaskStatus::Completed | TaskStatus::Skipped))
    }

    /// Returns the symbol at [`Self::resume_index`].
    #[must_use]
    pub fn resume_point(&self) -> Option<&str> {
        self.resume_index().map(|i| self.tasks[i].symbol.as_str())
    }

    /// Returns the symbols that exhausted their retries.
    pub fn failed_symbols(&self) -> impl Iterator<Item = &str> {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Failed)
            .map(|t| t.symbol.as_str())
    }

    /// Marks the run as started.
    pub fn mark_started(&mut self) {
        self.status = RunStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Marks the run as finished, with or without failures.
    pub fn mark_finished(&mut self) {
        self.status = if self.count(TaskStatus::Failed) > 0 {
            RunStatus::CompletedWithFailures
        } else {
            RunStatus::Completed
        };
        self.completed_at = Some(Utc::now());
    }
}
