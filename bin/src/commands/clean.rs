//! Run report cleanup command.

use anyhow::Result;
use barvault_lib::{BatchRun, StateManager};
use chrono::{DateTime, Utc};

/// Returns true if a finished run should be deleted.
fn should_clean(run: &BatchRun, all: bool, now: DateTime<Utc>) -> bool {
    let is_old = run.created_at < now - chrono::Duration::hours(24);
    run.is_finished() && (all || is_old)
}

/// Delete finished run reports (older than a day unless `all`).
pub(crate) fn clean_runs(state: &StateManager, all: bool) -> Result<()> {
    let now = Utc::now();
    let mut cleaned_count = 0;

    for run in state.list_runs()? {
        if should_clean(&run, all, now) {
            state.delete_run(run.id)?;
            cleaned_count += 1;
        }
    }

    if cleaned_count == 0 {
        println!("No runs to clean.");
    } else {
        println!("Cleaned {cleaned_count} run(s).");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use barvault_lib::{Destination, DownloadRequest, Provider, RunParams, SourceQuery, SymbolList};
    use barvault_lib::Compression;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn run(age_hours: i64, finished: bool) -> BatchRun {
        let params = RunParams {
            list_file: PathBuf::from("list.csv"),
            delimiter: ';',
            compression: Compression::Gzip,
            template: DownloadRequest::new(
                SourceQuery::new(""),
                Destination::new("/data", Provider::GoogleFinance, "S&P500/symbols", ""),
            ),
        };
        let mut run = BatchRun::new(params, &SymbolList::new(["AAA"]), None);
        run.created_at = Utc::now() - chrono::Duration::hours(age_hours);
        if finished {
            run.mark_started();
            run.mark_finished();
        }
        run
    }

    #[test]
    fn test_should_clean() {
        let now = Utc::now();
        assert!(should_clean(&run(48, true), false, now));
        assert!(!should_clean(&run(1, true), false, now));
        assert!(should_clean(&run(1, true), true, now));
        assert!(!should_clean(&run(48, false), true, now));
    }

    #[test]
    fn test_clean_runs_deletes_only_finished() {
        let temp = TempDir::new().unwrap();
        let state = StateManager::new(temp.path().to_path_buf()).unwrap();
        let finished = run(48, true);
        let pending = run(48, false);
        state.save_run(&finished).unwrap();
        state.save_run(&pending).unwrap();

        clean_runs(&state, false).unwrap();

        let left = state.list_runs().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, pending.id);
    }
}
