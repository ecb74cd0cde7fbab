//! Actions representing side effects to be executed by the session loop.
//!
//! The event handler mutates [`AppState`](crate::app::AppState) directly but
//! never touches the outside world. Anything that does (launching a browser,
//! ending the session) is returned as an [`Action`] and executed by
//! [`Session`](crate::app::Session) before the frame is drawn.
//!
//! # Example
//!
//! ```rust
//! use build_beaver::app::Action;
//!
//! let actions = vec![Action::OpenUrl("https://buildkite.com/acme/api/builds/1".into())];
//! assert!(matches!(actions[0], Action::OpenUrl(_)));
//! ```

/// Commands produced by the event handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Opens the given URL in the user's browser.
    ///
    /// Produced when the user presses Enter on a build that has a web URL.
    OpenUrl(String),

    /// Ends the session, leaving the last frame on screen.
    Quit,
}
