//! Top-level rendering coordinator.
//!
//! This module turns application state into terminal output in three steps:
//!
//! 1. **View Model Computation**: `AppState` → [`FrameViewModel`]
//! 2. **Layout**: [`frame_lines`] styles the header and lays out rows and details
//! 3. **Drawing**: [`draw`] hands the lines to the in-place [`Terminal`]
//!
//! # Frame Layout
//!
//! ```text
//! Use the arrow keys to navigate: ↓ ↑ ← → / toggles search ↵ jumps to the build
//! [status message, only for one frame]
//!   ▶ [ main | passed ] lexer
//!     [ fix-42 | failed ] lexer
//! ↓   [ main | running ] parser
//!
//! ---------------------------------------------
//! Message: ...
//! ```

use crate::app::AppState;
use crate::domain::error::Result;
use crate::domain::record::Fields;
use crate::ui::keys::{navigation_hint, CURSOR_GLYPH};
use crate::ui::template::{FormatterRegistry, Templates};
use crate::ui::terminal::Terminal;
use crate::ui::viewmodel::{FrameViewModel, HeaderInfo};
use std::io::Write;

/// Shown in place of the detail panel when the filter matches nothing.
pub const NO_MATCHES: &str = "no matching builds";

/// Renders the current state as one frame.
///
/// # Errors
///
/// Propagates [`draw`] errors.
pub fn render<T: Fields, W: Write>(
    state: &AppState<T>,
    templates: &Templates,
    terminal: &mut Terminal<W>,
) -> Result<()> {
    let viewmodel = state.compute_viewmodel(templates);
    let lines = frame_lines(&viewmodel, templates.formatters());
    draw(terminal, &lines)
}

/// Lays out a view model as terminal lines.
///
/// The header is painted with the `blue` formatter (`green` while searching),
/// the status line with `yellow`, and the empty-result notice with `dim`.
#[must_use]
pub fn frame_lines(vm: &FrameViewModel, formatters: &FormatterRegistry) -> Vec<String> {
    let mut lines = Vec::with_capacity(vm.line_count());

    lines.push(match &vm.header {
        HeaderInfo::Navigation { matches, total } if matches == total => {
            formatters.apply("blue", &navigation_hint())
        }
        HeaderInfo::Navigation { matches, total } => formatters.apply(
            "blue",
            &format!("{} ({matches} of {total})", navigation_hint()),
        ),
        HeaderInfo::Search { query } => {
            formatters.apply("green", &format!("Search: {query}{CURSOR_GLYPH}"))
        }
    });

    if let Some(status) = &vm.status {
        lines.push(formatters.apply("yellow", status));
    }

    lines.extend(
        vm.rows
            .iter()
            .map(|row| format!("{}{}", row.marker.glyph(), row.text)),
    );

    match &vm.details {
        Some(details) => lines.extend(details.iter().cloned()),
        None => lines.push(formatters.apply("dim", NO_MATCHES)),
    }

    lines
}

/// Draws one frame.
///
/// A frame whose line count differs from what is on screen is drawn from a
/// cleared region, so no row of the previous layout survives a resize of the
/// frame.
///
/// # Errors
///
/// Returns the first [`Terminal::write_line`] error, or the flush error.
pub fn draw<W: Write>(terminal: &mut Terminal<W>, lines: &[String]) -> Result<()> {
    let _span = tracing::trace_span!("draw", lines = lines.len()).entered();

    if lines.len() != terminal.height() {
        terminal.force_full_redraw();
    }

    for line in lines {
        terminal.write_line(line)?;
    }

    terminal.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::viewmodel::{PageMarker, RowItem};

    fn vm(rows: &[(&str, PageMarker)]) -> FrameViewModel {
        FrameViewModel {
            header: HeaderInfo::Navigation { matches: rows.len(), total: rows.len() },
            status: None,
            rows: rows
                .iter()
                .enumerate()
                .map(|(i, (text, marker))| RowItem {
                    marker: *marker,
                    text: (*text).to_string(),
                    is_active: i == 0,
                })
                .collect(),
            details: Some(vec!["detail".into()]),
        }
    }

    #[test]
    fn lays_out_header_rows_and_details() {
        let lines = frame_lines(
            &vm(&[("a", PageMarker::None), ("b", PageMarker::Down)]),
            &FormatterRegistry::plain(),
        );

        assert_eq!(lines, [navigation_hint(), "  a".into(), "↓ b".into(), "detail".into()]);
    }

    #[test]
    fn search_header_shows_query_and_cursor() {
        let mut model = vm(&[("a", PageMarker::None)]);
        model.header = HeaderInfo::Search { query: "main".into() };
        let lines = frame_lines(&model, &FormatterRegistry::plain());

        assert_eq!(lines[0], "Search: main█");
    }

    #[test]
    fn filtered_header_counts_matches() {
        let mut model = vm(&[("a", PageMarker::None)]);
        model.header = HeaderInfo::Navigation { matches: 1, total: 9 };
        let lines = frame_lines(&model, &FormatterRegistry::plain());

        assert!(lines[0].ends_with("(1 of 9)"));
    }

    #[test]
    fn status_and_empty_state() {
        let model = FrameViewModel {
            header: HeaderInfo::Navigation { matches: 0, total: 3 },
            status: Some("No build is selected".into()),
            rows: vec![],
            details: None,
        };
        let lines = frame_lines(&model, &FormatterRegistry::plain());

        assert_eq!(lines.len(), model.line_count());
        assert_eq!(lines[1], "No build is selected");
        assert_eq!(lines[2], NO_MATCHES);
    }

    #[test]
    fn changed_line_count_redraws_from_clear_region() {
        let mut term = Terminal::new(Vec::new());
        draw(&mut term, &["a".into(), "b".into()]).unwrap();
        draw(&mut term, &["a".into(), "b".into()]).unwrap();
        assert!(!term.is_reset_pending());
        let steady = term.get_ref().len();

        draw(&mut term, &["only".into()]).unwrap();
        assert_eq!(term.height(), 1);
        assert!(term.get_ref().len() > steady);
    }

    #[test]
    fn draw_rejects_multiline_text() {
        let mut term = Terminal::new(Vec::new());
        assert!(draw(&mut term, &["bad\nline".into()]).is_err());
    }
}
