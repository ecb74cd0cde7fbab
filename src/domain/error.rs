//! Error types for Build Beaver.
//!
//! This module defines the centralized error type [`BeaverError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented with the
//! `thiserror` crate for automatic `Error` trait implementation.
//!
//! # Severity
//!
//! Errors fall into three groups, see [`BeaverError::is_fatal`]:
//!
//! - **Session start**: `Configuration`, `EmptyInput`, `Credentials`, `Fetch`
//! - **Recoverable**: `EmptySelection`, `FieldNotFound`, `Browser`, `Io`
//!   (reported in the status line, the session keeps running)
//! - **Frame bookkeeping**: `ForbiddenCharacter`, `OutOfBounds` (a bug in
//!   whoever drives the renderer; the session is aborted)

use thiserror::Error;

/// The main error type for Build Beaver operations.
#[derive(Debug, Error)]
pub enum BeaverError {
    /// Invalid construction parameters or configuration values.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The navigator was given nothing to browse.
    #[error("Nothing to browse: the build list is empty")]
    EmptyInput,

    /// An operation needed a selected item but the filtered list is empty.
    #[error("No build is selected")]
    EmptySelection,

    /// The selected item does not expose the requested field.
    #[error("Selected build has no {0}")]
    FieldNotFound(&'static str),

    /// A renderer line contained `\r` or `\n`.
    #[error("{0:?} should not contain either \\r or \\n")]
    ForbiddenCharacter(String),

    /// The renderer's write cursor moved past the lines it tracks.
    #[error("Invalid write cursor position ({cursor}) exceeded line height: {height}")]
    OutOfBounds {
        /// Lines written in the current frame.
        cursor: usize,
        /// Lines tracked from the previous frame.
        height: usize,
    },

    /// Filesystem, terminal or sink I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A template failed to parse or to render.
    #[error("Template error: {0}")]
    Template(String),

    /// Retrieving builds from Buildkite failed.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// A build payload could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Organisation or token are missing or unreadable.
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// Launching the browser failed.
    #[error("Failed to open browser: {0}")]
    Browser(String),
}

impl BeaverError {
    /// Returns `true` when the error must end the interactive session.
    ///
    /// Recoverable errors are shown in the status line instead.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::EmptySelection | Self::FieldNotFound(_) | Self::Browser(_) | Self::Io(_)
        )
    }
}

impl From<reqwest::Error> for BeaverError {
    fn from(err: reqwest::Error) -> Self {
        Self::Fetch(err.to_string())
    }
}

impl From<toml::de::Error> for BeaverError {
    fn from(err: toml::de::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// A specialized `Result` type for Build Beaver operations.
pub type Result<T> = std::result::Result<T, BeaverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_errors_are_recoverable() {
        assert!(!BeaverError::EmptySelection.is_fatal());
        assert!(!BeaverError::FieldNotFound("web URL").is_fatal());
        assert!(!BeaverError::Browser("xdg-open missing".into()).is_fatal());
    }

    #[test]
    fn bookkeeping_errors_are_fatal() {
        assert!(BeaverError::OutOfBounds { cursor: 3, height: 2 }.is_fatal());
        assert!(BeaverError::ForbiddenCharacter("a\nb".into()).is_fatal());
        assert!(BeaverError::EmptyInput.is_fatal());
    }

    #[test]
    fn forbidden_character_message_quotes_text() {
        let msg = BeaverError::ForbiddenCharacter("a\nb".into()).to_string();
        assert!(msg.starts_with("\"a\\nb\""));
    }
}
