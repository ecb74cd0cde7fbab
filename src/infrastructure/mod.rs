//! Infrastructure layer for filesystem and operating system interactions.
//!
//! - [`paths`]: configuration, data and home directory resolution
//! - [`browser`]: handing URLs to the platform browser

pub mod browser;
pub mod paths;

pub use browser::{SystemBrowser, UrlOpener};
pub use paths::{config_dir, config_file, data_dir, expand_tilde};
