//! Filesystem locations for configuration and logs.
//!
//! Directories follow the platform conventions reported by the `dirs` crate:
//! on Linux the configuration lives in `$XDG_CONFIG_HOME/bkb` (usually
//! `~/.config/bkb`) and logs in `$XDG_DATA_HOME/bkb` (usually
//! `~/.local/share/bkb`).

use crate::domain::error::{BeaverError, Result};
use std::path::PathBuf;

/// Directory name used under the platform config and data directories.
pub const APP_DIR: &str = "bkb";

/// Configuration file name inside [`config_dir`].
pub const CONFIG_FILE: &str = "config.toml";

/// Returns the configuration directory.
///
/// # Errors
///
/// Returns [`BeaverError::Configuration`] if the platform has no config
/// directory (e.g. `$HOME` is unset).
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| BeaverError::Configuration("no configuration directory found".to_string()))
}

/// Returns the path of the configuration file.
///
/// # Errors
///
/// See [`config_dir`].
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Returns the data directory holding the log file.
///
/// Falls back to the system temporary directory when the platform reports
/// no data directory, so logging never blocks startup.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a tilde, or a home directory that cannot be determined,
/// are returned unchanged.
///
/// # Examples
///
/// ```
/// use build_beaver::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), std::path::PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }

    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
