//! Data directory layout for coursechat.
//!
//! Everything the client persists lives under one directory:
//! `config.toml`, `preferences.json` and the interactive-mode log file.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "COURSECHAT_DATA_DIR";

/// Log file written while the interactive chat owns the terminal.
pub const LOG_FILE: &str = "cchat.log";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `COURSECHAT_DATA_DIR` environment variable
/// 2. `~/.coursechat` under the user's home directory
/// 3. `.coursechat` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".coursechat");
    }

    PathBuf::from(".coursechat")
}

/// Create the data directory if it does not exist yet.
pub async fn ensure_data_dir(data_dir: &Path) -> Result<(), std::io::Error> {
    tokio::fs::create_dir_all(data_dir).await
}

/// Path of the interactive-mode log file: `{data_dir}/cchat.log`.
pub fn log_file_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE)
}
