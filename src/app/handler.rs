//! Event handling and state transition logic.
//!
//! This module implements the handler that turns one classified key press into
//! state changes and side-effect [`Action`]s. It never performs I/O itself; the
//! session loop executes the returned actions and redraws.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Key presses are classified into [`Event`]s by [`crate::ui::keys`]
//! 2. [`handle_event`] pattern-matches the event
//! 3. State mutations occur on [`AppState`] and its navigator
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! - **Navigation**: `Next`, `Prev`, `PageBackward`, `PageForward`; these work
//!   in both input modes
//! - **Search**: `ToggleSearch`, `Char`, `DeleteChar`
//! - **Selection**: `Select`
//! - **Exit**: `Escape`, `Quit`
//!
//! # Example
//!
//! ```rust
//! use build_beaver::app::{handle_event, AppState, Event};
//! use build_beaver::domain::Build;
//!
//! let mut state = AppState::new(vec![Build::default(), Build::default()], 5)?;
//! let actions = handle_event(&mut state, &Event::Next);
//! assert!(actions.is_empty());
//! assert_eq!(state.navigator.cursor(), 1);
//! # Ok::<(), build_beaver::BeaverError>(())
//! ```

use crate::app::{Action, AppState, InputMode};
use crate::domain::record::HasLink;

/// Key that ends the session outside search mode.
const QUIT_KEY: char = 'q';

/// Semantic input events, already decoupled from the terminal's key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Opens the active build in the browser.
    Select,
    /// Moves the cursor one row down.
    Next,
    /// Moves the cursor one row up.
    Prev,
    /// Enters or leaves search mode. The query and filter are kept.
    ToggleSearch,
    /// Shows the previous page of results.
    PageBackward,
    /// Shows the next page of results.
    PageForward,
    /// Removes the last character of the search query.
    DeleteChar,
    /// A printable character.
    Char(char),
    /// Leaves search mode, or ends the session from normal mode.
    Escape,
    /// Ends the session unconditionally.
    Quit,
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// The status message of the previous frame is cleared first, so a message
/// is shown for exactly one frame.
///
/// # Parameters
///
/// * `state` - Mutable reference to application state
/// * `event` - Event to process
///
/// # Returns
///
/// Actions to execute in order. Usually empty; `Select` yields
/// [`Action::OpenUrl`] and the exit keys yield [`Action::Quit`].
///
/// # Tracing
///
/// Each call enters a debug-level span carrying the event.
pub fn handle_event<T: HasLink>(state: &mut AppState<T>, event: &Event) -> Vec<Action> {
    let _span = tracing::debug_span!("handle_event", event = ?event).entered();

    state.status = None;

    match event {
        Event::Next => {
            state.navigator.next();
            trace_position(state);
            vec![]
        }
        Event::Prev => {
            state.navigator.prev();
            trace_position(state);
            vec![]
        }
        Event::PageBackward => {
            state.navigator.page_up();
            trace_position(state);
            vec![]
        }
        Event::PageForward => {
            state.navigator.page_down();
            trace_position(state);
            vec![]
        }
        Event::ToggleSearch => {
            state.input_mode = state.input_mode.toggled();
            tracing::debug!(mode = ?state.input_mode, query = %state.search_query, "search toggled");
            vec![]
        }
        Event::Char(c) => match state.input_mode {
            InputMode::Search => {
                state.search_query.push(*c);
                tracing::trace!(query = %state.search_query, "search query updated");
                state.apply_search();
                vec![]
            }
            InputMode::Normal if *c == QUIT_KEY => vec![Action::Quit],
            InputMode::Normal => vec![],
        },
        Event::DeleteChar => {
            if !state.input_mode.is_search() {
                return vec![];
            }

            if state.search_query.chars().count() <= 1 {
                tracing::debug!("query emptied, leaving search mode");
                clear_search(state);
            } else {
                state.search_query.pop();
                state.apply_search();
            }
            vec![]
        }
        Event::Select => match state.navigator.open_active() {
            Ok(url) => {
                tracing::debug!(url, "opening build");
                vec![Action::OpenUrl(url.to_string())]
            }
            Err(err) => {
                tracing::debug!(error = %err, "nothing to open");
                state.set_status(err.to_string());
                vec![]
            }
        },
        Event::Escape => match state.input_mode {
            InputMode::Search => {
                clear_search(state);
                vec![]
            }
            InputMode::Normal => vec![Action::Quit],
        },
        Event::Quit => vec![Action::Quit],
    }
}

/// Leaves search mode and restores the unfiltered list.
fn clear_search<T>(state: &mut AppState<T>) {
    state.input_mode = InputMode::Normal;
    state.search_query.clear();
    state.apply_search();
}

fn trace_position<T>(state: &AppState<T>) {
    tracing::debug!(
        cursor = state.navigator.cursor(),
        start = state.navigator.start(),
        matches = state.navigator.len(),
        "navigated"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Build;

    fn state(n: usize, size: usize) -> AppState<Build> {
        let builds = (0..n)
            .map(|i| Build {
                branch: if i % 2 == 0 { format!("main-{i}") } else { format!("feature-{i}") },
                web_url: format!("https://buildkite.com/acme/api/builds/{i}"),
                ..Build::default()
            })
            .collect();
        AppState::new(builds, size).unwrap()
    }

    fn send(state: &mut AppState<Build>, events: &[Event]) -> Vec<Action> {
        events.iter().flat_map(|e| handle_event(state, e)).collect()
    }

    fn type_str(state: &mut AppState<Build>, text: &str) {
        for c in text.chars() {
            handle_event(state, &Event::Char(c));
        }
    }

    #[test]
    fn navigation_moves_cursor() {
        let mut state = state(10, 3);
        send(&mut state, &[Event::Next, Event::Next, Event::Next, Event::Prev]);
        assert_eq!(state.navigator.cursor(), 2);

        send(&mut state, &[Event::PageForward]);
        assert_eq!((state.navigator.start(), state.navigator.cursor()), (4, 4));
        send(&mut state, &[Event::PageBackward]);
        assert_eq!((state.navigator.start(), state.navigator.cursor()), (1, 1));
    }

    #[test]
    fn typing_in_search_mode_filters() {
        let mut state = state(6, 5);
        handle_event(&mut state, &Event::ToggleSearch);
        type_str(&mut state, "feature");

        assert_eq!(state.search_query, "feature");
        assert_eq!(state.navigator.len(), 3);
    }

    #[test]
    fn toggling_search_keeps_filter() {
        let mut state = state(6, 5);
        handle_event(&mut state, &Event::ToggleSearch);
        type_str(&mut state, "main");
        handle_event(&mut state, &Event::ToggleSearch);

        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.search_query, "main");
        assert_eq!(state.navigator.len(), 3);
    }

    #[test]
    fn characters_outside_search_are_ignored() {
        let mut state = state(4, 2);
        let actions = send(&mut state, &[Event::Char('x'), Event::DeleteChar]);

        assert!(actions.is_empty());
        assert!(state.search_query.is_empty());
        assert_eq!(state.navigator.len(), 4);
    }

    #[test]
    fn q_quits_only_in_normal_mode() {
        let mut state = state(4, 2);
        assert_eq!(handle_event(&mut state, &Event::Char('q')), [Action::Quit]);

        handle_event(&mut state, &Event::ToggleSearch);
        assert!(handle_event(&mut state, &Event::Char('q')).is_empty());
        assert_eq!(state.search_query, "q");
    }

    #[test]
    fn backspace_pops_and_refilters() {
        let mut state = state(6, 5);
        handle_event(&mut state, &Event::ToggleSearch);
        type_str(&mut state, "main-4x");
        assert_eq!(state.navigator.len(), 0);

        handle_event(&mut state, &Event::DeleteChar);
        assert_eq!(state.search_query, "main-4");
        assert_eq!(state.navigator.len(), 1);
        assert!(state.input_mode.is_search());
    }

    #[test]
    fn backspace_on_last_char_leaves_search() {
        let mut state = state(6, 5);
        handle_event(&mut state, &Event::ToggleSearch);
        type_str(&mut state, "f");
        assert_eq!(state.navigator.len(), 3);

        handle_event(&mut state, &Event::DeleteChar);
        assert_eq!(state.input_mode, InputMode::Normal);
        assert!(state.search_query.is_empty());
        assert_eq!(state.navigator.len(), 6);
    }

    #[test]
    fn backspace_counts_characters_not_bytes() {
        let mut state = state(2, 2);
        handle_event(&mut state, &Event::ToggleSearch);
        type_str(&mut state, "é");

        handle_event(&mut state, &Event::DeleteChar);
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn select_opens_active_build() {
        let mut state = state(3, 2);
        let actions = send(&mut state, &[Event::Next, Event::Select]);
        assert_eq!(
            actions,
            [Action::OpenUrl("https://buildkite.com/acme/api/builds/1".into())]
        );
    }

    #[test]
    fn select_without_match_sets_status_for_one_frame() {
        let mut state = state(3, 2);
        handle_event(&mut state, &Event::ToggleSearch);
        type_str(&mut state, "nothing matches");

        assert!(handle_event(&mut state, &Event::Select).is_empty());
        assert!(state.status.is_some());

        handle_event(&mut state, &Event::Next);
        assert!(state.status.is_none());
    }

    #[test]
    fn select_without_url_sets_status() {
        let mut state = AppState::new(vec![Build::default()], 1).unwrap();
        assert!(handle_event(&mut state, &Event::Select).is_empty());
        assert!(state.status.as_deref().is_some_and(|s| s.contains("web URL")));
    }

    #[test]
    fn escape_clears_search_then_quits() {
        let mut state = state(6, 5);
        handle_event(&mut state, &Event::ToggleSearch);
        type_str(&mut state, "main");

        assert!(handle_event(&mut state, &Event::Escape).is_empty());
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.navigator.len(), 6);

        assert_eq!(handle_event(&mut state, &Event::Escape), [Action::Quit]);
    }

    #[test]
    fn quit_works_in_both_modes() {
        let mut state = state(2, 2);
        assert_eq!(handle_event(&mut state, &Event::Quit), [Action::Quit]);
        handle_event(&mut state, &Event::ToggleSearch);
        assert_eq!(handle_event(&mut state, &Event::Quit), [Action::Quit]);
    }
}
