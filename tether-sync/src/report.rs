//! Last-run report persisted for front-ends.
//!
//! Persists a [`RunResult`] JSON document at `<home>/.tether/last-run.json`.
//! Writes use the same atomic `.tmp` + rename pattern as the registry.

use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};
use crate::orchestrator::RunResult;

/// Path to the last-run report, rooted at `home`.
///
/// `~/.tether/last-run.json`
pub fn report_path_at(home: &Path) -> PathBuf {
    home.join(".tether").join("last-run.json")
}

/// Load the last run's report.
///
/// Returns `None` if no run has been recorded yet.
pub fn load_at(home: &Path) -> Result<Option<RunResult>, SyncError> {
    let path = report_path_at(home);
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    Ok(Some(serde_json::from_str(&contents)?))
}

/// Save a run report atomically.
///
/// Writes to `<path>.tmp` then renames to `<path>`.
pub fn save_at(home: &Path, result: &RunResult) -> Result<(), SyncError> {
    let path = report_path_at(home);
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("invalid report path")));
    };

    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let json = serde_json::to_string_pretty(result)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}
