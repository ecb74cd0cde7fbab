//! Build source abstraction.
//!
//! This module defines the [`BuildSource`] trait that abstracts over where the
//! browsed builds come from. The session only ever sees `Vec<Build>`, so the
//! live API and a saved response file are interchangeable.

use crate::domain::build::Build;
use crate::domain::error::Result;

/// Something that can produce the list of builds to browse.
///
/// # Implementations
///
/// - [`BuildkiteClient`](crate::source::BuildkiteClient): the Buildkite REST API
/// - [`JsonFileSource`](crate::source::JsonFileSource): a saved API response
///
/// # Examples
///
/// ```no_run
/// use build_beaver::source::{BuildSource, JsonFileSource};
///
/// let source = JsonFileSource::new("builds.json");
/// let builds = source.fetch()?;
/// println!("{} builds from {}", builds.len(), source.describe());
/// # Ok::<(), build_beaver::BeaverError>(())
/// ```
pub trait BuildSource {
    /// Retrieves the builds, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the builds cannot be retrieved or decoded.
    fn fetch(&self) -> Result<Vec<Build>>;

    /// Short human-readable description for logs and messages.
    fn describe(&self) -> String;
}
