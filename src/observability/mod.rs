//! File-based logging.
//!
//! The terminal is owned by the interactive frame, so diagnostics go to a
//! log file instead:
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → RotatingFile (bkb.log)
//! ```
//!
//! # Features
//!
//! - **File Output**: events written to `bkb.log` in the data directory
//! - **Automatic Rotation**: files rotate at 10MB with 3-backup retention
//!
//! # Configuration
//!
//! Log level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` option in the config file
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Rotating file writer with size-based rotation

pub mod file_writer;
pub mod init;

pub use file_writer::RotatingFile;
pub use init::{init_tracing, LOG_FILE};
