//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "tether";
const APPLICATION: &str = "tether-demo";

/// Name of the log file of the current run.
const LATEST_LOG: &str = "latest.log";

/// Maximum number of old log files to keep.
const MAX_OLD_LOGS: usize = 10;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory, where logs are written.
///
/// - Linux: `$XDG_CACHE_HOME/tether-demo` or `~/.cache/tether-demo`
/// - macOS: `~/Library/Caches/dev.tether.tether-demo`
/// - Windows: `C:\Users\<User>\AppData\Local\tether\tether-demo\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the path to the log file, falling back to the working directory
/// when no home directory is known.
pub fn log_file() -> PathBuf {
    cache_dir()
        .map(|dir| dir.join(LATEST_LOG))
        .unwrap_or_else(|| PathBuf::from("tether-demo.log"))
}

/// Rename the previous run's log to a timestamped name and drop old logs.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    let latest = cache.join(LATEST_LOG);

    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let _ = fs::rename(&latest, cache.join(format!("{timestamp}.log")));
    }
    cleanup_old_logs(&cache);
}

fn cleanup_old_logs(cache_dir: &Path) {
    let Ok(entries) = fs::read_dir(cache_dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();

    // Oldest first
    logs.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());

    if logs.len() > MAX_OLD_LOGS {
        for entry in logs.iter().take(logs.len() - MAX_OLD_LOGS) {
            let _ = fs::remove_file(entry.path());
        }
    }
}
