//! View model types representing one renderable frame.
//!
//! View models are computed from application state by
//! [`AppState::compute_viewmodel`](crate::app::AppState::compute_viewmodel) and
//! consumed by [`frame_lines`](crate::ui::renderer::frame_lines). They hold
//! display-ready text only: templates are already applied, line breaks already
//! removed from row text, and the detail panel already split into lines.
//!
//! # Example
//!
//! ```rust
//! use build_beaver::ui::viewmodel::{FrameViewModel, HeaderInfo, PageMarker, RowItem};
//!
//! let vm = FrameViewModel {
//!     header: HeaderInfo::Navigation { matches: 1, total: 1 },
//!     status: None,
//!     rows: vec![RowItem {
//!         marker: PageMarker::None,
//!         text: "lexer main passed".to_string(),
//!         is_active: true,
//!     }],
//!     details: Some(vec!["Fix tokenizer".to_string()]),
//! };
//! assert_eq!(vm.line_count(), 3);
//! ```

/// Complete view model for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameViewModel {
    /// First line of the frame.
    pub header: HeaderInfo,

    /// Transient message shown under the header.
    pub status: Option<String>,

    /// Visible rows, top to bottom.
    pub rows: Vec<RowItem>,

    /// Detail panel of the active row, one entry per line.
    ///
    /// `None` when the filter matched nothing.
    pub details: Option<Vec<String>>,
}

impl FrameViewModel {
    /// Number of terminal lines the frame occupies.
    #[must_use]
    pub fn line_count(&self) -> usize {
        1 + usize::from(self.status.is_some())
            + self.rows.len()
            + self.details.as_ref().map_or(1, Vec::len)
    }
}

/// Header line content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderInfo {
    /// Key hints, with the number of builds matching the current filter.
    Navigation {
        /// Builds in the current filter.
        matches: usize,
        /// Builds fetched.
        total: usize,
    },

    /// The query being typed.
    Search {
        /// Current search query.
        query: String,
    },
}

/// Page indicator drawn in front of a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageMarker {
    /// Earlier rows exist above this one.
    Up,
    /// Later rows exist below this one.
    Down,
    #[default]
    None,
}

impl PageMarker {
    /// Glyph for this marker, padded to a fixed width.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Up => "↑ ",
            Self::Down => "↓ ",
            Self::None => "  ",
        }
    }
}

/// One visible row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowItem {
    /// Page indicator in front of the row.
    pub marker: PageMarker,

    /// Output of the active or inactive row template.
    pub text: String,

    /// Whether the cursor is on this row.
    pub is_active: bool,
}
