//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "tabula";
const APPLICATION: &str = "backoffice";

/// Get project directories, or None if home directory cannot be determined.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory for logs.
///
/// - Linux: `$XDG_CACHE_HOME/backoffice` or `~/.cache/backoffice`
/// - macOS: `~/Library/Caches/dev.tabula.backoffice`
/// - Windows: `C:\Users\<User>\AppData\Local\tabula\backoffice\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the config directory.
///
/// - Linux: `$XDG_CONFIG_HOME/backoffice` or `~/.config/backoffice`
/// - macOS: `~/Library/Application Support/dev.tabula.backoffice`
/// - Windows: `C:\Users\<User>\AppData\Roaming\tabula\backoffice\config`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default location of the shell configuration.
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

const LATEST_LOG: &str = "latest.log";

/// Maximum number of old log files to keep.
pub const MAX_OLD_LOGS: usize = 25;

/// Rotate logs in the platform cache directory.
///
/// Call this at startup before creating the new log file.
pub fn rotate_logs() {
    if let Some(cache) = cache_dir() {
        rotate_logs_in(&cache, MAX_OLD_LOGS);
    }
}

/// Rename `latest.log` to a timestamped name, then keep only the `keep`
/// most recent archives.
pub fn rotate_logs_in(dir: &Path, keep: usize) {
    let latest = dir.join(LATEST_LOG);
    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let mut archived = dir.join(format!("{}.log", timestamp));
        // Two runs within the same second
        let mut n = 1;
        while archived.exists() {
            archived = dir.join(format!("{}_{}.log", timestamp, n));
            n += 1;
        }
        if let Err(e) = fs::rename(&latest, &archived) {
            log::warn!("[paths] could not archive {}: {}", latest.display(), e);
        }
    }
    cleanup_old_logs(dir, keep);
}

/// Remove old log files, keeping only the most recent `keep`.
fn cleanup_old_logs(dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();

    // Oldest first; the name breaks ties between equal mtimes
    logs.sort_by_key(|e| (e.metadata().and_then(|m| m.modified()).ok(), e.file_name()));

    if logs.len() > keep {
        for entry in logs.iter().take(logs.len() - keep) {
            let path = entry.path();
            if let Err(e) = fs::remove_file(&path) {
                log::warn!("[paths] could not remove old log {}: {}", path.display(), e);
            }
        }
    }
}
