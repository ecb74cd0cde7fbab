//! Windowed, filterable list navigation.
//!
//! [`Navigator`] keeps a cursor and a fixed-height viewport over a filtered
//! view (the *scope*) of an immutable item list. It knows nothing about
//! rendering: the render loop asks it for the visible window and draws that.
//!
//! # Invariants
//!
//! Whenever the scope is non-empty, after every operation settles:
//!
//! ```text
//! 0 <= cursor < len(scope)
//! start <= cursor < start + size
//! ```
//!
//! # Example
//!
//! ```rust
//! use build_beaver::app::Navigator;
//!
//! let mut nav = Navigator::new(vec!["alpha", "beta", "gamma"], 2)?;
//! nav.next();
//! nav.next();
//! let (window, active) = nav.visible_window();
//! assert_eq!(window, vec![&"beta", &"gamma"]);
//! assert_eq!(active, Some(1));
//!
//! nav.search("al");
//! assert_eq!(nav.visible_window().0, vec![&"alpha"]);
//! # Ok::<(), build_beaver::BeaverError>(())
//! ```

use crate::domain::error::{BeaverError, Result};
use crate::domain::record::HasLink;
use std::fmt;

/// Filterable list with a cursor and a scrolling window of `size` rows.
#[derive(Debug, Clone)]
pub struct Navigator<T> {
    /// Every item, in insertion order. Never changes after construction.
    items: Vec<T>,

    /// Search text of each item, parallel to `items`.
    texts: Vec<String>,

    /// Indices into `items` of the current filter result, in order.
    scope: Vec<usize>,

    /// Selected position within `scope`.
    cursor: usize,

    /// Position within `scope` of the first visible row.
    start: usize,

    /// Maximum number of visible rows.
    size: usize,
}

impl<T: fmt::Display> Navigator<T> {
    /// Creates a navigator over `items` showing at most `size` rows.
    ///
    /// The textual form used by [`search`](Self::search) is taken from each
    /// item's `Display` output once, here.
    ///
    /// # Errors
    ///
    /// - [`BeaverError::Configuration`] if `size` is zero
    /// - [`BeaverError::EmptyInput`] if `items` is empty
    pub fn new(items: Vec<T>, size: usize) -> Result<Self> {
        if size < 1 {
            return Err(BeaverError::Configuration(format!(
                "list size {size} must be greater than 0"
            )));
        }
        if items.is_empty() {
            return Err(BeaverError::EmptyInput);
        }

        let texts = items.iter().map(ToString::to_string).collect();
        let scope = (0..items.len()).collect();

        Ok(Self {
            items,
            texts,
            scope,
            cursor: 0,
            start: 0,
            size,
        })
    }
}

impl<T> Navigator<T> {
    /// Returns the visible slice of the scope and the cursor's position in it.
    ///
    /// The position is `None` when the cursor is outside the window, which
    /// only happens when the scope is empty.
    #[must_use]
    pub fn visible_window(&self) -> (Vec<&T>, Option<usize>) {
        let end = (self.start + self.size).min(self.scope.len());
        let start = self.start.min(end);

        let window: Vec<&T> = self.scope[start..end]
            .iter()
            .map(|&idx| &self.items[idx])
            .collect();

        let active = (start..end).position(|i| i == self.cursor);

        (window, active)
    }

    /// Moves the cursor down one row, scrolling so it stays the last visible row.
    pub fn next(&mut self) {
        let Some(last) = self.scope.len().checked_sub(1) else {
            return;
        };

        if self.cursor < last {
            self.cursor += 1;
        }

        if self.start + self.size <= self.cursor {
            self.start = self.cursor + 1 - self.size;
        }
    }

    /// Moves the cursor up one row, scrolling so it stays the first visible row.
    pub fn prev(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }

        if self.start > self.cursor {
            self.start = self.cursor;
        }
    }

    /// Moves the window back by `size` rows.
    ///
    /// The selected item becomes the first visible row unless it is already
    /// above it.
    pub fn page_up(&mut self) {
        self.start = self.start.saturating_sub(self.size);

        if self.start < self.cursor {
            self.cursor = self.start;
        }
    }

    /// Moves the window forward by `size` rows.
    ///
    /// The window never scrolls past the last full page, and a scope shorter
    /// than `size` always starts at 0. When the window cannot move any
    /// further the cursor jumps to the last item; otherwise a cursor left
    /// above the new window is pulled down to its first row.
    pub fn page_down(&mut self) {
        let len = self.scope.len();
        if len == 0 {
            return;
        }

        let previous = self.start;
        self.start = if len < self.size {
            0
        } else {
            (self.start + self.size).min(len - self.size)
        };

        if self.start == previous {
            self.cursor = len - 1;
        } else if self.start > self.cursor {
            self.cursor = self.start;
        }
    }

    /// Whether [`page_up`](Self::page_up) would reveal earlier rows.
    #[must_use]
    pub const fn can_page_up(&self) -> bool {
        self.start > 0
    }

    /// Whether rows exist below the current window.
    #[must_use]
    pub fn can_page_down(&self) -> bool {
        self.start + self.size < self.scope.len()
    }

    /// Replaces the scope with the items whose text contains `key`.
    ///
    /// Surrounding whitespace is trimmed from `key`; an empty key restores every
    /// item. Matching is a case-sensitive substring test. Cursor and window
    /// are reset to the top.
    pub fn search(&mut self, key: &str) {
        let key = key.trim();

        let _span = tracing::debug_span!(
            "search",
            total_items = self.items.len(),
            key_len = key.len()
        )
        .entered();

        self.cursor = 0;
        self.start = 0;

        self.scope = if key.is_empty() {
            (0..self.items.len()).collect()
        } else {
            self.texts
                .iter()
                .enumerate()
                .filter(|(_, text)| text.contains(key))
                .map(|(idx, _)| idx)
                .collect()
        };

        tracing::debug!(matches = self.scope.len(), "search applied");
    }

    /// Returns the item under the cursor, if the scope is non-empty.
    #[must_use]
    pub fn active(&self) -> Option<&T> {
        self.scope.get(self.cursor).map(|&idx| &self.items[idx])
    }

    /// Selected position within the scope.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Position within the scope of the first visible row.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Maximum number of visible rows.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Number of items matching the current filter.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scope.len()
    }

    /// Whether the current filter matched nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scope.is_empty()
    }

    /// Number of items regardless of filter.
    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Iterates over the items in the current scope, in order.
    pub fn scope(&self) -> impl Iterator<Item = &T> + '_ {
        self.scope.iter().map(|&idx| &self.items[idx])
    }
}

impl<T: HasLink> Navigator<T> {
    /// Returns the web URL of the item under the cursor.
    ///
    /// # Errors
    ///
    /// - [`BeaverError::EmptySelection`] if the scope is empty
    /// - [`BeaverError::FieldNotFound`] if the item has no link
    pub fn open_active(&self) -> Result<&str> {
        let item = self.active().ok_or(BeaverError::EmptySelection)?;
        item.link().ok_or(BeaverError::FieldNotFound("web URL"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Navigator<usize> {
        Navigator::new((0..n).collect(), 5).unwrap()
    }

    fn assert_settled<T>(nav: &Navigator<T>) {
        if nav.is_empty() {
            return;
        }
        assert!(nav.cursor() < nav.len(), "cursor {} outside scope", nav.cursor());
        assert!(
            nav.start() <= nav.cursor() && nav.cursor() < nav.start() + nav.size(),
            "cursor {} outside window starting at {}",
            nav.cursor(),
            nav.start()
        );
    }

    struct Linked(Option<&'static str>);

    impl fmt::Display for Linked {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0.unwrap_or("none"))
        }
    }

    impl HasLink for Linked {
        fn link(&self) -> Option<&str> {
            self.0
        }
    }

    #[test]
    fn rejects_zero_size() {
        let err = Navigator::new(vec![1, 2], 0).unwrap_err();
        assert!(matches!(err, BeaverError::Configuration(_)));
    }

    #[test]
    fn rejects_empty_items() {
        let err = Navigator::<u8>::new(vec![], 3).unwrap_err();
        assert!(matches!(err, BeaverError::EmptyInput));
    }

    #[test]
    fn starts_at_top() {
        let nav = numbered(10);
        assert_eq!((nav.cursor(), nav.start()), (0, 0));
        let (window, active) = nav.visible_window();
        assert_eq!(window, vec![&0, &1, &2, &3, &4]);
        assert_eq!(active, Some(0));
    }

    #[test]
    fn next_and_prev_stop_at_edges() {
        let mut nav = numbered(3);
        nav.prev();
        assert_eq!(nav.cursor(), 0);

        for _ in 0..10 {
            nav.next();
        }
        assert_eq!(nav.cursor(), 2);
        assert_eq!(nav.start(), 0);
    }

    #[test]
    fn invariant_holds_for_mixed_navigation() {
        // Deterministic pseudo-random walk over every operation.
        for size in 1..=6 {
            for len in 1..=13 {
                let mut nav = Navigator::new((0..len).collect::<Vec<_>>(), size).unwrap();
                let mut seed: u32 = 0x9E37_79B9 ^ (size as u32 * 31 + len as u32);
                for _ in 0..200 {
                    seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                    match (seed >> 16) % 4 {
                        0 => nav.next(),
                        1 => nav.prev(),
                        2 => nav.page_up(),
                        _ => nav.page_down(),
                    }
                    assert_settled(&nav);
                }
            }
        }
    }

    #[test]
    fn scrolls_when_cursor_leaves_window() {
        let mut nav = numbered(10);
        for _ in 0..6 {
            nav.next();
        }
        assert_eq!((nav.cursor(), nav.start()), (5, 1));

        for _ in 0..5 {
            nav.prev();
        }
        assert_eq!((nav.cursor(), nav.start()), (0, 0));
    }

    #[test]
    fn page_down_clamps_then_jumps_to_last() {
        let mut nav = numbered(10);
        for _ in 0..6 {
            nav.next();
        }

        nav.page_down();
        assert_eq!((nav.start(), nav.cursor()), (5, 5));

        nav.page_down();
        assert_eq!((nav.start(), nav.cursor()), (5, 9));
    }

    #[test]
    fn page_down_pulls_cursor_forward() {
        let mut nav = Navigator::new((0..20).collect::<Vec<_>>(), 5).unwrap();
        nav.page_down();
        assert_eq!((nav.start(), nav.cursor()), (5, 5));
        nav.page_down();
        assert_eq!((nav.start(), nav.cursor()), (10, 10));
    }

    #[test]
    fn page_down_on_short_list_selects_last() {
        let mut nav = Navigator::new(vec!['a', 'b', 'c'], 5).unwrap();
        nav.page_down();
        assert_eq!((nav.start(), nav.cursor()), (0, 2));
        assert!(!nav.can_page_down());
    }

    #[test]
    fn repeated_page_down_reaches_last_page() {
        for len in 1..=17 {
            let mut nav = Navigator::new((0..len).collect::<Vec<_>>(), 5).unwrap();
            let mut calls = 0;
            while nav.can_page_down() {
                nav.page_down();
                calls += 1;
                assert!(calls <= len, "page_down did not terminate for {len}");
            }
            let expected = if len < 5 { 0 } else { len - 5 };
            assert_eq!(nav.start(), expected);
        }
    }

    #[test]
    fn page_up_selects_first_visible_row() {
        let mut nav = numbered(12);
        nav.page_down();
        nav.page_down();
        assert_eq!((nav.start(), nav.cursor()), (7, 7));
        for _ in 0..3 {
            nav.next();
        }
        assert_eq!((nav.start(), nav.cursor()), (7, 10));

        nav.page_up();
        assert_eq!((nav.start(), nav.cursor()), (2, 2));

        nav.page_up();
        assert_eq!((nav.start(), nav.cursor()), (0, 0));
        assert!(!nav.can_page_up());
    }

    #[test]
    fn page_flags_follow_window() {
        let mut nav = numbered(10);
        assert!(!nav.can_page_up());
        assert!(nav.can_page_down());

        nav.page_down();
        assert_eq!(nav.start(), 5);
        assert!(nav.can_page_up());
        assert!(!nav.can_page_down());
    }

    #[test]
    fn search_filters_by_substring() {
        let mut nav = Navigator::new(vec!["alpha", "beta", "gamma"], 2).unwrap();

        nav.search("a");
        assert_eq!(nav.scope().copied().collect::<Vec<_>>(), ["alpha", "beta", "gamma"]);
        assert_eq!((nav.cursor(), nav.start()), (0, 0));

        nav.search("al");
        assert_eq!(nav.scope().copied().collect::<Vec<_>>(), ["alpha"]);
    }

    #[test]
    fn search_trims_and_restores() {
        let mut nav = Navigator::new(vec!["alpha", "beta", "gamma"], 2).unwrap();
        nav.next();
        nav.next();

        nav.search("  mm ");
        assert_eq!(nav.scope().copied().collect::<Vec<_>>(), ["gamma"]);
        assert_eq!(nav.cursor(), 0);

        nav.search("\tbe\n");
        assert_eq!(nav.scope().copied().collect::<Vec<_>>(), ["beta"]);

        nav.search(" \t ");
        assert_eq!(nav.len(), 3);

        nav.search("");
        assert_eq!(nav.scope().copied().collect::<Vec<_>>(), ["alpha", "beta", "gamma"]);
    }

    #[test]
    fn search_is_case_sensitive() {
        let mut nav = Navigator::new(vec!["Alpha", "alpha"], 2).unwrap();
        nav.search("A");
        assert_eq!(nav.scope().copied().collect::<Vec<_>>(), ["Alpha"]);
    }

    #[test]
    fn empty_scope_is_handled() {
        let mut nav = Navigator::new(vec!["alpha", "beta"], 2).unwrap();
        nav.search("zzz");

        let (window, active) = nav.visible_window();
        assert!(window.is_empty());
        assert_eq!(active, None);

        nav.next();
        nav.prev();
        nav.page_down();
        nav.page_up();
        assert_eq!((nav.cursor(), nav.start()), (0, 0));
        assert!(!nav.can_page_down());
    }

    #[test]
    fn open_active_returns_link() {
        let nav = Navigator::new(vec![Linked(Some("https://example.com/1"))], 1).unwrap();
        assert_eq!(nav.open_active().unwrap(), "https://example.com/1");
    }

    #[test]
    fn open_active_reports_missing_link() {
        let nav = Navigator::new(vec![Linked(None)], 1).unwrap();
        assert!(matches!(nav.open_active(), Err(BeaverError::FieldNotFound(_))));
    }

    #[test]
    fn open_active_reports_empty_selection() {
        let mut nav = Navigator::new(vec![Linked(Some("https://example.com/1"))], 1).unwrap();
        nav.search("nothing matches");
        assert!(matches!(nav.open_active(), Err(BeaverError::EmptySelection)));
    }
}
