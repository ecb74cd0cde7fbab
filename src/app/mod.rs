//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the binary (`main.rs`) and the domain, source and
//! UI layers. It owns the browsing state and the event loop that drives it.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Key press → Event → Event Handler → State Mutations → Actions → Side Effects
//!                                          ↓
//!                                   View Model → Frame → Terminal
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Input mode state machine type
//! - [`navigator`]: Windowed cursor over a filtered list
//! - [`session`]: Terminal event loop tying input, state and rendering together
//! - [`state`]: Central application state container and view model computation
//!
//! # Example
//!
//! ```rust
//! use build_beaver::app::{handle_event, Action, AppState, Event};
//! use build_beaver::domain::Build;
//!
//! let mut state = AppState::new(vec![Build::default()], 5)?;
//! let actions = handle_event(&mut state, &Event::Quit);
//! assert_eq!(actions, [Action::Quit]);
//! # Ok::<(), build_beaver::BeaverError>(())
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod navigator;
pub mod session;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::InputMode;
pub use navigator::Navigator;
pub use session::{CrosstermKeys, KeySource, RawModeGuard, Session};
pub use state::AppState;
