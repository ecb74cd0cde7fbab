//! Differential, in-place terminal writer.
//!
//! [`Terminal`] redraws a block of lines at a fixed position on every frame
//! instead of printing below the previous output. Each frame is a sequence of
//! [`write_line`](Terminal::write_line) calls followed by one
//! [`flush`](Terminal::flush):
//!
//! ```text
//! frame 1:  clear+"a"+CRLF   clear+"b"+CRLF   clear+"c"+CRLF        height = 3
//! frame 2:  up×3  clear+"x"+down  clear+"y"+down  clear+down        height = 3
//!                                                 └ stale line "c" erased
//! ```
//!
//! Lines that existed in the previous frame are overwritten and followed by a
//! cursor-down; lines beyond that grow the region with a line break. After the
//! flush the terminal cursor rests just below the region, and the move back up
//! to its top is queued as the first bytes of the next frame, so the prompt
//! lands below the list when the session ends.
//!
//! Everything is accumulated in an internal buffer; the sink is only written
//! during `flush`, in a single `write_all`.

use crate::domain::error::{BeaverError, Result};
use crossterm::cursor::{MoveDown, MoveToColumn, MoveUp};
use crossterm::terminal::{Clear, ClearType};
use crossterm::Command;
use std::io::Write;

/// Renders a crossterm command to its ANSI escape sequence.
fn ansi(command: impl Command) -> String {
    let mut buf = String::new();
    let _ = command.write_ansi(&mut buf);
    buf
}

/// Clears the current line and returns to its first column.
fn clear_line() -> String {
    ansi(Clear(ClearType::CurrentLine)) + &ansi(MoveToColumn(0))
}

fn move_up() -> String {
    ansi(MoveUp(1))
}

fn move_down() -> String {
    ansi(MoveDown(1))
}

/// In-place multi-line writer over an output sink.
///
/// # State
///
/// - `height`: lines occupied on screen by the current or previous frame
/// - `cursor`: lines written so far in the current frame (`0..=height`)
/// - `reset`: full redraw requested for the next frame
/// - `rewind`: lines to move up before the next frame starts writing
#[derive(Debug)]
pub struct Terminal<W: Write> {
    sink: W,
    buf: Vec<u8>,
    reset: bool,
    cursor: usize,
    height: usize,
    rewind: usize,
}

impl<W: Write> Terminal<W> {
    /// Creates a terminal writer with nothing drawn yet.
    pub const fn new(sink: W) -> Self {
        Self {
            sink,
            buf: Vec::new(),
            reset: false,
            cursor: 0,
            height: 0,
            rewind: 0,
        }
    }

    /// Appends one line to the current frame.
    ///
    /// # Errors
    ///
    /// - [`BeaverError::ForbiddenCharacter`] if `text` contains `\r` or `\n`;
    ///   nothing is buffered and no state changes
    /// - [`BeaverError::OutOfBounds`] if the write cursor has passed the
    ///   tracked height
    pub fn write_line(&mut self, text: &str) -> Result<()> {
        if text.contains(['\r', '\n']) {
            return Err(BeaverError::ForbiddenCharacter(text.to_string()));
        }

        if self.reset && self.cursor == 0 {
            self.clear_region();
        }

        if self.cursor > self.height {
            return Err(BeaverError::OutOfBounds {
                cursor: self.cursor,
                height: self.height,
            });
        }

        self.emit_rewind();

        self.push(&clear_line());
        self.push(text);

        if self.cursor == self.height {
            self.push("\r\n");
            self.height += 1;
        } else {
            self.push(&move_down());
        }
        self.cursor += 1;

        Ok(())
    }

    /// Ends the frame: erases stale lines, writes the buffer to the sink and
    /// queues the move back to the top of the region.
    ///
    /// `height` is kept, since it still describes what is on screen.
    ///
    /// # Errors
    ///
    /// Returns [`BeaverError::Io`] if the sink rejects the write. The frame is
    /// dropped either way, so the next frame starts from clean bookkeeping.
    pub fn flush(&mut self) -> Result<()> {
        self.emit_rewind();

        let clear = clear_line();
        let down = move_down();
        for _ in self.cursor..self.height {
            self.push(&clear);
            self.push(&down);
        }

        let written = self
            .sink
            .write_all(&self.buf)
            .and_then(|()| self.sink.flush());

        self.buf.clear();
        self.rewind = self.height;
        self.cursor = 0;

        written.map_err(BeaverError::from)
    }

    /// Requests that the next frame first erase the whole region and redraw
    /// from an empty screen.
    ///
    /// Takes effect on the first [`write_line`](Self::write_line) of the next
    /// frame.
    pub fn force_full_redraw(&mut self) {
        self.reset = true;
    }

    /// Lines on screen from the current or previous frame.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Lines written so far in the current frame.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether a full redraw is pending.
    #[must_use]
    pub const fn is_reset_pending(&self) -> bool {
        self.reset
    }

    /// Borrows the output sink.
    pub const fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Mutably borrows the output sink, for out-of-band writes between frames.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Consumes the writer and returns the sink. Unflushed lines are dropped.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn push(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
    }

    /// Emits the move to the top of the region queued by the last flush.
    fn emit_rewind(&mut self) {
        if self.rewind > 0 {
            let up = move_up();
            for _ in 0..self.rewind {
                self.push(&up);
            }
            self.rewind = 0;
        }
    }

    /// Walks up through the previous frame clearing every line, leaving the
    /// cursor at the top of an empty region.
    fn clear_region(&mut self) {
        let up = move_up();
        let clear = clear_line();
        for _ in 0..self.height {
            self.push(&up);
            self.push(&clear);
        }

        tracing::trace!(cleared = self.height, "full redraw");

        self.rewind = 0;
        self.cursor = 0;
        self.height = 0;
        self.reset = false;
    }
}
