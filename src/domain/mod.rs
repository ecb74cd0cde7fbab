//! Domain layer for Build Beaver.
//!
//! This module contains the core domain types, independent of the terminal,
//! the Buildkite API, or any other infrastructure concern.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`build`]: The `Build` record shown in the list
//! - [`record`]: Capability traits (`HasLink`, `Fields`) records implement
//!
//! # Examples
//!
//! ```
//! use build_beaver::domain::{Build, HasLink};
//!
//! let build = Build {
//!     web_url: "https://buildkite.com/acme/api/builds/42".to_string(),
//!     ..Build::default()
//! };
//! assert_eq!(build.link(), Some("https://buildkite.com/acme/api/builds/42"));
//! ```

pub mod build;
pub mod error;
pub mod record;

pub use build::Build;
pub use error::{BeaverError, Result};
pub use record::{Fields, HasLink};
