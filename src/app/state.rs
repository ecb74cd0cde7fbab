//! Application state management and view model computation.
//!
//! This module defines [`AppState`], the single source of truth for one
//! browsing session: the [`Navigator`] over the fetched builds, the input
//! mode, the search query being typed and a transient status message.
//!
//! # View Model Computation
//!
//! [`AppState::compute_viewmodel`] turns the state into a
//! [`FrameViewModel`]: the visible rows with their page markers and template
//! output, and the detail panel of the active item. Rendering then only has to
//! lay those strings out.
//!
//! # Example
//!
//! ```rust
//! use build_beaver::app::AppState;
//! use build_beaver::domain::Build;
//! use build_beaver::ui::{FormatterRegistry, Templates};
//! use build_beaver::TemplateConfig;
//!
//! let builds = vec![Build { branch: "main".into(), ..Build::default() }];
//! let state = AppState::new(builds, 5)?;
//! let templates = Templates::new(&TemplateConfig::default(), FormatterRegistry::plain())?;
//! let vm = state.compute_viewmodel(&templates);
//! assert_eq!(vm.rows.len(), 1);
//! # Ok::<(), build_beaver::BeaverError>(())
//! ```

use super::modes::InputMode;
use super::navigator::Navigator;
use crate::domain::error::Result;
use crate::domain::record::Fields;
use crate::ui::template::Templates;
use crate::ui::viewmodel::{FrameViewModel, HeaderInfo, PageMarker, RowItem};
use std::fmt;

/// Central state of a browsing session.
#[derive(Debug, Clone)]
pub struct AppState<T> {
    /// Cursor, window and filter over the session's items.
    pub navigator: Navigator<T>,

    /// Current input handling mode.
    pub input_mode: InputMode,

    /// Query typed in search mode.
    ///
    /// Kept when search mode is toggled off, so the filter stays applied.
    pub search_query: String,

    /// One-frame message shown under the header, e.g. a failed open.
    ///
    /// Cleared by the handler at the start of every event.
    pub status: Option<String>,

    /// Warning about a frame that failed to reach the terminal.
    ///
    /// Survives event handling and is dropped once a frame showing it has
    /// been drawn.
    pub warning: Option<String>,
}

impl<T: fmt::Display> AppState<T> {
    /// Creates the state for a session over `items`, showing `size` rows.
    ///
    /// # Errors
    ///
    /// Propagates the navigator's construction errors: zero `size` or no items.
    pub fn new(items: Vec<T>, size: usize) -> Result<Self> {
        Ok(Self {
            navigator: Navigator::new(items, size)?,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            status: None,
            warning: None,
        })
    }
}

impl<T> AppState<T> {
    /// Re-filters the list with the current query.
    pub fn apply_search(&mut self) {
        self.navigator.search(&self.search_query);
    }

    /// Records a message for the next frame.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Records a warning that stays until a frame has displayed it.
    pub fn set_warning(&mut self, message: impl Into<String>) {
        self.warning = Some(message.into());
    }
}

impl<T: Fields> AppState<T> {
    /// Computes the renderable frame for the current state.
    ///
    /// The first visible row carries an up marker when earlier rows exist and
    /// the last one a down marker when later rows exist. Template output is
    /// flattened to single lines; the detail panel is split on line breaks.
    #[must_use]
    pub fn compute_viewmodel(&self, templates: &Templates) -> FrameViewModel {
        let (items, active) = self.navigator.visible_window();
        let last = items.len().saturating_sub(1);

        let rows = items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let marker = if idx == 0 && self.navigator.can_page_up() {
                    PageMarker::Up
                } else if idx == last && self.navigator.can_page_down() {
                    PageMarker::Down
                } else {
                    PageMarker::None
                };
                let is_active = active == Some(idx);

                RowItem {
                    marker,
                    text: single_line(&templates.render_row(*item, is_active)),
                    is_active,
                }
            })
            .collect();

        let details = active
            .and_then(|idx| items.get(idx))
            .map(|item| {
                templates
                    .render_details(*item)
                    .iter()
                    .map(|line| single_line(line))
                    .collect()
            });

        FrameViewModel {
            header: self.compute_header(),
            status: self.status_line(),
            rows,
            details,
        }
    }

    /// Warning and status joined on one line.
    fn status_line(&self) -> Option<String> {
        match (self.warning.as_deref(), self.status.as_deref()) {
            (Some(warning), Some(status)) => Some(single_line(&format!("{warning}; {status}"))),
            (warning, status) => warning.or(status).map(single_line),
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        if self.input_mode.is_search() {
            HeaderInfo::Search {
                query: single_line(&self.search_query),
            }
        } else {
            HeaderInfo::Navigation {
                matches: self.navigator.len(),
                total: self.navigator.total(),
            }
        }
    }
}

/// Replaces line breaks so a string fits on one terminal row.
fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}
