//! Interactive browsing session.
//!
//! A [`Session`] owns everything one run of the browser needs: the
//! application state, the templates, the in-place [`Terminal`] and a
//! [`UrlOpener`]. [`Session::run`] draws the first frame, then for every key
//! press:
//!
//! 1. classifies it into an [`Event`] (unbound keys are skipped)
//! 2. lets [`handle_event`] update the state
//! 3. executes the returned actions
//! 4. redraws the frame
//!
//! Input comes from a [`KeySource`], so the loop runs the same against a real
//! terminal ([`CrosstermKeys`] inside a [`RawModeGuard`]) and a scripted
//! sequence in tests.

use crate::app::{handle_event, Action, AppState, Event};
use crate::domain::error::Result;
use crate::domain::record::{Fields, HasLink};
use crate::infrastructure::browser::UrlOpener;
use crate::ui::keys::classify;
use crate::ui::renderer::render;
use crate::ui::template::Templates;
use crate::ui::terminal::Terminal;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event as TermEvent, KeyEvent};
use crossterm::execute;
use crossterm::terminal::{self, DisableLineWrap, EnableLineWrap};
use std::io::{self, Write};
use std::ops::ControlFlow;

/// A stream of key presses.
pub trait KeySource {
    /// Blocks until the next key press. `None` means input has ended.
    ///
    /// # Errors
    ///
    /// Returns [`BeaverError::Io`](crate::BeaverError::Io) if reading fails.
    fn next_key(&mut self) -> Result<Option<KeyEvent>>;
}

/// Reads key presses from the controlling terminal.
///
/// Mouse, focus, paste and resize events are skipped.
#[derive(Debug, Default)]
pub struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn next_key(&mut self) -> Result<Option<KeyEvent>> {
        loop {
            if let TermEvent::Key(key) = event::read()? {
                return Ok(Some(key));
            }
        }
    }
}

/// Puts the terminal in raw mode for as long as it lives.
///
/// Also hides the cursor and disables line wrapping, so an over-long row
/// cannot push the frame down a line. Everything is restored on drop.
#[derive(Debug)]
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    /// Enables raw mode.
    ///
    /// # Errors
    ///
    /// Returns [`BeaverError::Io`](crate::BeaverError::Io) if stdout is not a
    /// terminal or the mode cannot be changed.
    pub fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self { _private: () };
        execute!(io::stdout(), Hide, DisableLineWrap)?;
        Ok(guard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(err) = execute!(io::stdout(), Show, EnableLineWrap) {
            tracing::warn!(error = %err, "failed to restore cursor");
        }
        if let Err(err) = terminal::disable_raw_mode() {
            tracing::warn!(error = %err, "failed to leave raw mode");
        }
    }
}

/// One run of the interactive browser.
#[derive(Debug)]
pub struct Session<T, W: Write, O> {
    state: AppState<T>,
    templates: Templates,
    terminal: Terminal<W>,
    opener: O,
}

impl<T, W, O> Session<T, W, O>
where
    T: Fields + HasLink,
    W: Write,
    O: UrlOpener,
{
    /// Assembles a session. Nothing is drawn until [`run`](Self::run).
    pub const fn new(
        state: AppState<T>,
        templates: Templates,
        terminal: Terminal<W>,
        opener: O,
    ) -> Self {
        Self {
            state,
            templates,
            terminal,
            opener,
        }
    }

    /// Runs the event loop until a quit key or the end of input.
    ///
    /// The last frame stays on screen with the cursor below it.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error (see
    /// [`BeaverError::is_fatal`](crate::BeaverError::is_fatal)) from reading
    /// keys or drawing.
    pub fn run<K: KeySource>(&mut self, keys: &mut K) -> Result<()> {
        let _span = tracing::info_span!("session", builds = self.state.navigator.total()).entered();

        self.redraw()?;

        while let Some(key) = keys.next_key()? {
            let Some(event) = classify(key) else {
                continue;
            };
            if self.step(&event)?.is_break() {
                tracing::info!("session ended by user");
                return Ok(());
            }
        }

        tracing::info!("input closed");
        Ok(())
    }

    /// Processes one event and redraws, unless the event ends the session.
    ///
    /// # Errors
    ///
    /// Returns fatal drawing errors.
    pub fn step(&mut self, event: &Event) -> Result<ControlFlow<()>> {
        for action in handle_event(&mut self.state, event) {
            match action {
                Action::OpenUrl(url) => {
                    if let Err(err) = self.opener.open(&url) {
                        tracing::warn!(error = %err, url = %url, "could not open build");
                        self.state.set_status(err.to_string());
                    }
                }
                Action::Quit => return Ok(ControlFlow::Break(())),
            }
        }

        self.redraw()?;
        Ok(ControlFlow::Continue(()))
    }

    /// Draws the current state, absorbing recoverable errors.
    ///
    /// A frame that fails to reach the terminal leaves a warning for the
    /// next frame, which is cleared once a frame has been drawn.
    fn redraw(&mut self) -> Result<()> {
        match render(&self.state, &self.templates, &mut self.terminal) {
            Ok(()) => {
                self.state.warning = None;
                Ok(())
            }
            Err(err) if !err.is_fatal() => {
                tracing::warn!(error = %err, "frame not drawn");
                self.state.set_warning(format!("display may be stale: {err}"));
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "rendering failed");
                Err(err)
            }
        }
    }

    /// Current application state.
    pub const fn state(&self) -> &AppState<T> {
        &self.state
    }

    /// The terminal writer.
    pub const fn terminal(&self) -> &Terminal<W> {
        &self.terminal
    }

    /// The URL opener.
    pub const fn opener(&self) -> &O {
        &self.opener
    }
}
