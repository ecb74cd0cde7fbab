//! Tracing initialization and subscriber setup.
//!
//! This module configures the tracing subscriber: an [`EnvFilter`] chooses
//! the level, and a plain-text fmt layer writes events to a rotating file in
//! the data directory. Nothing is written to the terminal, which belongs to
//! the interactive frame.

use super::file_writer::RotatingFile;
use crate::infrastructure::paths;
use crate::Config;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the log file inside the data directory.
pub const LOG_FILE: &str = "bkb.log";

/// Level used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LEVEL: &str = "info";

/// Initializes the tracing subscriber with file output.
///
/// # Level Resolution
///
/// 1. `RUST_LOG` environment variable
/// 2. `config.trace_level`
/// 3. [`DEFAULT_LEVEL`]
///
/// # Initialization Behavior
///
/// - Creates the data directory if it doesn't exist
/// - Silently gives up if it cannot (logging is optional)
/// - Only the first call installs a subscriber
///
/// Returns the log file path when a subscriber was installed.
///
/// # Example
///
/// ```rust
/// use build_beaver::observability::init_tracing;
/// use build_beaver::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
///
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) -> Option<PathBuf> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level(config.trace_level.as_deref())));

    let data_dir = paths::data_dir();
    std::fs::create_dir_all(&data_dir).ok()?;
    let log_file = data_dir.join(LOG_FILE);

    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(RotatingFile::new(log_file.clone())));

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .ok()?;

    Some(log_file)
}

/// Configured level, falling back to [`DEFAULT_LEVEL`] when unset or blank.
fn level(configured: Option<&str>) -> &str {
    configured
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_LEVEL)
}
