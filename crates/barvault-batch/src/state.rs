//! Persistent storage for batch run reports.

use crate::{BatchRun, RunId};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur while storing run reports.
#[derive(Error, Debug)]
pub enum StateError {
    /// Failed to create a directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to delete a file.
    #[error("Failed to delete file '{path}': {source}")]
    DeleteFile {
        /// The path that could not be deleted.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse JSON.
    #[error("Failed to parse run file '{path}': {source}")]
    ParseJson {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Failed to serialize JSON.
    #[error("Failed to serialize run: {0}")]
    SerializeJson(#[from] serde_json::Error),

    /// Run not found.
    #[error("Run not found: {0}")]
    RunNotFound(RunId),

    /// Failed to read directory.
    #[error("Failed to read directory '{path}': {source}")]
    ReadDir {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Result type for state operations.
pub type Result<T> = std::result::Result<T, StateError>;

/// Stores run reports as JSON files under `<base>/runs/`.
#[derive(Debug, Clone)]
pub struct StateManager {
    base_path: PathBuf,
    runs_path: PathBuf,
}

impl StateManager {
    /// Creates a state manager with the given base path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn new(base_path: PathBuf) -> Result<Self> {
        let runs_path = base_path.join("runs");

        if !runs_path.exists() {
            fs::create_dir_all(&runs_path).map_err(|e| StateError::CreateDir {
                path: runs_path.clone(),
                source: e,
            })?;
        }

        Ok(Self {
            base_path,
            runs_path,
        })
    }

    /// Returns the default path for barvault state storage.
    ///
    /// - Linux: `~/.local/share/barvault/`
    /// - macOS: `~/Library/Application Support/barvault/`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\barvault\`
    ///
    /// Falls back to `~/.barvault/` if the platform location cannot be
    /// determined.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "barvault").map_or_else(dirs_fallback, |proj_dirs| {
            proj_dirs.data_dir().to_path_buf()
        })
    }

    /// Creates a state manager at the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn with_default_path() -> Result<Self> {
        Self::new(Self::default_path())
    }

    /// Returns the base path for state storage.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the path to a run's report file.
    #[must_use]
    pub fn run_path(&self, run_id: RunId) -> PathBuf {
        self.runs_path.join(format!("{run_id}.json"))
    }

    /// Saves a run report, replacing any previous version.
    ///
    /// # Errors
    ///
    /// Returns an error if the run cannot be serialized or written to disk.
    pub fn save_run(&self, run: &BatchRun) -> Result<()> {
        let path = self.run_path(run.id);
        let json = serde_json::to_string_pretty(run)?;

        fs::write(&path, json).map_err(|e| StateError::WriteFile { path, source: e })
    }

    /// Loads a run report.
    ///
    /// # Errors
    ///
    /// Returns an error if the run does not exist or cannot be parsed.
    pub fn load_run(&self, run_id: RunId) -> Result<BatchRun> {
        let path = self.run_path(run_id);

        if !path.exists() {
            return Err(StateError::RunNotFound(run_id));
        }

        let content = fs::read_to_string(&path).map_err(|e| StateError::ReadFile {
            path: path.clone(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| StateError::ParseJson { path, source: e })
    }

    /// Lists all run reports, newest first.
    ///
    /// Files that fail to parse are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the runs directory cannot be read.
    pub fn list_runs(&self) -> Result<Vec<BatchRun>> {
        let entries = fs::read_dir(&self.runs_path).map_err(|e| StateError::ReadDir {
            path: self.runs_path.clone(),
            source: e,
        })?;

        let mut runs = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| StateError::ReadDir {
                path: self.runs_path.clone(),
                source: e,
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let content = fs::read_to_string(&path).map_err(|e| StateError::ReadFile {
                    path: path.clone(),
                    source: e,
                })?;

                match serde_json::from_str::<BatchRun>(&content) {
                    Ok(run) => runs.push(run),
                    Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable run file"),
                }
            }
        }

        runs.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(runs)
    }

    /// Returns the most recently created run, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if runs cannot be listed.
    pub fn latest_run(&self) -> Result<Option<BatchRun>> {
        Ok(self.list_runs()?.into_iter().next())
    }

    /// Deletes a run report.
    ///
    /// # Errors
    ///
    /// Returns an error if the run does not exist or cannot be deleted.
    pub fn delete_run(&self, run_id: RunId) -> Result<()> {
        let path = self.run_path(run_id);

        if !path.exists() {
            return Err(StateError::RunNotFound(run_id));
        }

        fs::remove_file(&path).map_err(|e| StateError::DeleteFile { path, source: e })
    }
}

fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".barvault")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_run;
    use chrono::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_state_manager_creation() {
        let temp_dir = TempDir::new().unwrap();
        let manager = StateManager::new(temp_dir.path().to_path_buf()).unwrap();

        assert!(manager.base_path().exists());
        assert!(temp_dir.path().join("runs").exists());
    }

    #[test]
    fn test_save_and_load_run() {
        let temp_dir = TempDir::new().unwrap();
        let manager = StateManager::new(temp_dir.path().to_path_buf()).unwrap();

        let run = test_run(&["AAA", "BBB"]);
        manager.save_run(&run).unwrap();

        let loaded = manager.load_run(run.id).unwrap();
        assert_eq!(loaded.id, run.id);
        assert_eq!(loaded.tasks.len(), 2);
        assert_eq!(loaded.tasks[1].symbol, "BBB");
    }

    #[test]
    fn test_list_runs_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let manager = StateManager::new(temp_dir.path().to_path_buf()).unwrap();

        let older = test_run(&["AAA"]);
        let mut newer = test_run(&["BBB"]);
        newer.created_at = older.created_at + Duration::seconds(5);

        manager.save_run(&older).unwrap();
        manager.save_run(&newer).unwrap();

        let runs = manager.list_runs().unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].id, newer.id);
        assert_eq!(manager.latest_run().unwrap().unwrap().id, newer.id);
    }

    #[test]
    fn test_list_runs_skips_corrupt_files() {
        let temp_dir = TempDir::new().unwrap();
        let manager = StateManager::new(temp_dir.path().to_path_buf()).unwrap();

        manager.save_run(&test_run(&["AAA"])).unwrap();
        fs::write(temp_dir.path().join("runs/broken.json"), "{ nope").unwrap();

        assert_eq!(manager.list_runs().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_run() {
        let temp_dir = TempDir::new().unwrap();
        let manager = StateManager::new(temp_dir.path().to_path_buf()).unwrap();

        let run = test_run(&["AAA"]);
        manager.save_run(&run).unwrap();
        manager.delete_run(run.id).unwrap();

        assert!(matches!(
            manager.load_run(run.id),
            Err(StateError::RunNotFound(_))
        ));
        assert!(matches!(
            manager.delete_run(run.id),
            Err(StateError::RunNotFound(_))
        ));
    }

    #[test]
    fn test_run_path() {
        let temp_dir = TempDir::new().unwrap();
        let manager = StateManager::new(temp_dir.path().to_path_buf()).unwrap();

        let path = manager.run_path(uuid::Uuid::new_v4());
        assert!(path.to_string_lossy().contains("runs"));
        assert!(path.to_string_lossy().ends_with(".json"));
    }
}
