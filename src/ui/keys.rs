//! Key bindings and the glyphs shown for them.
//!
//! Raw terminal input arrives as crossterm [`KeyEvent`]s; [`classify`] turns
//! each one into the semantic [`Event`] the application handler understands.
//! Arrow keys and their emacs-style control equivalents are interchangeable:
//!
//! | Event          | Keys                |
//! |----------------|---------------------|
//! | `Next`         | `↓`, `Ctrl+n`       |
//! | `Prev`         | `↑`, `Ctrl+p`       |
//! | `PageBackward` | `←`, `Ctrl+b`       |
//! | `PageForward`  | `→`, `Ctrl+f`       |
//! | `ToggleSearch` | `/`                 |
//! | `Select`       | `Enter`             |
//! | `DeleteChar`   | `Backspace`         |
//! | `Escape`       | `Esc`               |
//! | `Quit`         | `Ctrl+c`, `Ctrl+d`  |

use crate::app::Event;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Block glyph drawn after the search query as a fake text cursor.
pub const CURSOR_GLYPH: &str = "\u{2588}";

/// Key that toggles search mode.
pub const SEARCH_KEY: char = '/';

pub const NEXT_DISPLAY: &str = "↓";
pub const PREV_DISPLAY: &str = "↑";
pub const BACKWARD_DISPLAY: &str = "←";
pub const FORWARD_DISPLAY: &str = "→";
pub const ENTER_DISPLAY: &str = "↵";

/// Maps a key press to an application event.
///
/// Returns `None` for key releases/repeats on platforms that report them and
/// for keys with no binding (function keys, `Tab`, ...).
///
/// # Example
///
/// ```rust
/// use build_beaver::app::Event;
/// use build_beaver::ui::keys::classify;
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
///
/// let key = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
/// assert_eq!(classify(key), Some(Event::Next));
/// ```
#[must_use]
pub fn classify(key: KeyEvent) -> Option<Event> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('n') => Some(Event::Next),
            KeyCode::Char('p') => Some(Event::Prev),
            KeyCode::Char('b') => Some(Event::PageBackward),
            KeyCode::Char('f') => Some(Event::PageForward),
            KeyCode::Char('c' | 'd') => Some(Event::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Enter => Some(Event::Select),
        KeyCode::Down => Some(Event::Next),
        KeyCode::Up => Some(Event::Prev),
        KeyCode::Left => Some(Event::PageBackward),
        KeyCode::Right => Some(Event::PageForward),
        KeyCode::Backspace => Some(Event::DeleteChar),
        KeyCode::Esc => Some(Event::Escape),
        KeyCode::Char(SEARCH_KEY) => Some(Event::ToggleSearch),
        KeyCode::Char(c) if !c.is_control() => Some(Event::Char(c)),
        _ => None,
    }
}

/// One-line usage hint shown above the list outside search mode.
#[must_use]
pub fn navigation_hint() -> String {
    format!(
        "Use the arrow keys to navigate: {NEXT_DISPLAY} {PREV_DISPLAY} {BACKWARD_DISPLAY} \
         {FORWARD_DISPLAY} {SEARCH_KEY} toggles search {ENTER_DISPLAY} jumps to the build"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn arrows_and_control_keys_agree() {
        assert_eq!(classify(press(KeyCode::Down)), classify(ctrl('n')));
        assert_eq!(classify(press(KeyCode::Up)), classify(ctrl('p')));
        assert_eq!(classify(press(KeyCode::Left)), classify(ctrl('b')));
        assert_eq!(classify(press(KeyCode::Right)), classify(ctrl('f')));
        assert_eq!(classify(press(KeyCode::Left)), Some(Event::PageBackward));
    }

    #[test]
    fn printable_characters_pass_through() {
        assert_eq!(classify(press(KeyCode::Char('x'))), Some(Event::Char('x')));
        assert_eq!(
            classify(KeyEvent::new(KeyCode::Char('X'), KeyModifiers::SHIFT)),
            Some(Event::Char('X'))
        );
    }

    #[test]
    fn slash_toggles_search() {
        assert_eq!(classify(press(KeyCode::Char('/'))), Some(Event::ToggleSearch));
    }

    #[test]
    fn interrupt_quits() {
        assert_eq!(classify(ctrl('c')), Some(Event::Quit));
        assert_eq!(classify(ctrl('d')), Some(Event::Quit));
    }

    #[test]
    fn releases_and_unbound_keys_are_ignored() {
        let mut release = press(KeyCode::Down);
        release.kind = KeyEventKind::Release;
        assert_eq!(classify(release), None);
        assert_eq!(classify(press(KeyCode::Tab)), None);
        assert_eq!(classify(ctrl('z')), None);
    }

    #[test]
    fn hint_mentions_every_binding() {
        let hint = navigation_hint();
        for glyph in [NEXT_DISPLAY, PREV_DISPLAY, BACKWARD_DISPLAY, FORWARD_DISPLAY, "/"] {
            assert!(hint.contains(glyph));
        }
    }
}
