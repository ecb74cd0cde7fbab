//! Input mode state for the application.
//!
//! The browser is either navigating the list or editing a search query.
//! Navigation keys work in both modes; printable keys only reach the query in
//! [`InputMode::Search`].
//!
//! # Example
//!
//! ```rust
//! use build_beaver::app::InputMode;
//!
//! let mode = InputMode::Normal.toggled();
//! assert_eq!(mode, InputMode::Search);
//! ```

/// Current input handling mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Default mode: keys navigate, `q` and `Esc` quit.
    #[default]
    Normal,

    /// Printable keys edit the search query and re-filter the list on every
    /// keystroke. `Backspace` on a one-character query leaves this mode.
    Search,
}

impl InputMode {
    /// Returns the other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Search,
            Self::Search => Self::Normal,
        }
    }

    /// Whether printable keys edit the search query.
    #[must_use]
    pub const fn is_search(self) -> bool {
        matches!(self, Self::Search)
    }
}
