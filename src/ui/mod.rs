//! Terminal user interface layer.
//!
//! This module turns application state into ANSI output drawn in place, below
//! the shell prompt, without taking over the whole screen.
//!
//! # Architecture
//!
//! ```text
//! AppState → compute_viewmodel → FrameViewModel → frame_lines → Terminal
//! ```
//!
//! # Modules
//!
//! - [`keys`]: Key bindings and their display glyphs
//! - [`renderer`]: Frame layout and drawing
//! - [`template`]: Row/detail templates and their formatters
//! - [`terminal`]: Differential in-place line writer
//! - [`theme`]: Colour palettes and ANSI escape sequence generation
//! - [`viewmodel`]: Display-ready frame description
//!
//! # Example
//!
//! ```rust
//! use build_beaver::app::AppState;
//! use build_beaver::domain::Build;
//! use build_beaver::ui::{render, FormatterRegistry, Templates, Terminal};
//! use build_beaver::TemplateConfig;
//!
//! let state = AppState::new(vec![Build::default()], 5)?;
//! let templates = Templates::new(&TemplateConfig::default(), FormatterRegistry::plain())?;
//! let mut terminal = Terminal::new(Vec::new());
//! render(&state, &templates, &mut terminal)?;
//! assert!(!terminal.get_ref().is_empty());
//! # Ok::<(), build_beaver::BeaverError>(())
//! ```

pub mod keys;
pub mod renderer;
pub mod template;
pub mod terminal;
pub mod theme;
pub mod viewmodel;

pub use renderer::{draw, frame_lines, render};
pub use template::{FormatterRegistry, Template, Templates};
pub use terminal::Terminal;
pub use theme::Theme;
pub use viewmodel::{FrameViewModel, HeaderInfo, PageMarker, RowItem};
