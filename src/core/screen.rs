//! # Screen
//!
//! The unit of raw-terminal interaction. A `Screen` owns everything the mode
//! handlers read and mutate:
//!
//! ```text
//! Screen
//! ├── mode: Mode                 // exactly one active mode
//! ├── handle: T                  // terminal, read + write
//! ├── input: CursorBuffer        // line being edited
//! ├── output: CursorBuffer       // output region (submissions, yanks, errors)
//! ├── history: Vec<String>       // submitted commands, append-only
//! ├── current_command: Vec<u8>   // last submitted command
//! ├── selection_anchor           // Visual mode anchor
//! └── history_pos                // Up/Down navigation in Insert mode
//! ```
//!
//! Mode changes only happen through the state machine in `dispatch.rs`.
//! Writes go straight to the handle and are flushed immediately.

use std::io::{self, Read, Write};

use log::debug;

use super::buffer::{CursorBuffer, DEFAULT_CAPACITY};
use super::key::{DecodeError, Key, read_key};
use super::mode::Mode;

const REVERSE_VIDEO: &[u8] = b"\x1b[7m";
const RESET_ATTRIBUTES: &[u8] = b"\x1b[0m";

pub struct Screen<T> {
    mode: Mode,
    handle: T,
    input: CursorBuffer,
    output: CursorBuffer,
    history: Vec<String>,
    current_command: Vec<u8>,
    selection_anchor: Option<usize>,
    history_pos: Option<usize>,
}

impl<T> Screen<T> {
    pub fn new(handle: T, mode: Mode) -> Self {
        Self {
            mode,
            handle,
            input: CursorBuffer::new(),
            output: CursorBuffer::new(),
            history: Vec::with_capacity(DEFAULT_CAPACITY),
            current_command: Vec::with_capacity(DEFAULT_CAPACITY),
            selection_anchor: None,
            history_pos: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn input(&self) -> &CursorBuffer {
        &self.input
    }

    pub fn output(&self) -> &CursorBuffer {
        &self.output
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn current_command(&self) -> &[u8] {
        &self.current_command
    }

    pub fn handle(&self) -> &T {
        &self.handle
    }

    #[cfg(test)]
    pub(crate) fn handle_mut(&mut self) -> &mut T {
        &mut self.handle
    }

    pub fn into_handle(self) -> T {
        self.handle
    }

    /// Selected byte range of the input (`start..end`), present only in Visual mode.
    ///
    /// The byte under the cursor is part of the selection.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.selection_anchor?;
        let cursor = self.input.cursor();
        let (start, end) = if anchor <= cursor {
            (anchor, cursor)
        } else {
            (cursor, anchor)
        };
        Some((start, (end + 1).min(self.input.len())))
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        debug!("Mode transition: {} -> {}", self.mode, mode);
        self.selection_anchor = match mode {
            Mode::Visual => Some(self.input.cursor()),
            Mode::Normal | Mode::Insert => None,
        };
        self.mode = mode;
    }

    pub(crate) fn input_mut(&mut self) -> &mut CursorBuffer {
        &mut self.input
    }

    pub(crate) fn output_mut(&mut self) -> &mut CursorBuffer {
        &mut self.output
    }

    /// Records a submitted line. Empty lines are not kept in history.
    pub(crate) fn record_command(&mut self, line: &[u8]) {
        self.current_command.clear();
        self.current_command.extend_from_slice(line);
        self.history_pos = None;
        if !line.is_empty() {
            self.history.push(String::from_utf8_lossy(line).into_owned());
        }
    }

    /// Steps back through history. Returns the entry to show, or None at the oldest.
    pub(crate) fn history_prev(&mut self) -> Option<String> {
        let pos = match self.history_pos {
            None if self.history.is_empty() => return None,
            None => self.history.len() - 1,
            Some(0) => return None,
            Some(pos) => pos - 1,
        };
        self.history_pos = Some(pos);
        Some(self.history[pos].clone())
    }

    /// Steps forward through history. Past the newest entry yields an empty line.
    pub(crate) fn history_next(&mut self) -> Option<String> {
        let pos = self.history_pos?;
        if pos + 1 >= self.history.len() {
            self.history_pos = None;
            return Some(String::new());
        }
        self.history_pos = Some(pos + 1);
        Some(self.history[pos + 1].clone())
    }
}

impl<T: Read> Screen<T> {
    /// Blocks until one full key has been read from the terminal.
    pub fn read_key(&mut self) -> Result<Key, DecodeError> {
        read_key(&mut self.handle)
    }
}

impl<T: Write> Screen<T> {
    /// Writes bytes to the terminal and flushes them.
    pub fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.handle.write_all(bytes)?;
        self.handle.flush()
    }

    /// Writes the canonical rendering of `key`.
    pub fn write_key(&mut self, key: Key) -> io::Result<()> {
        self.write(&key.render())
    }

    /// Repaints from the cursor to the end of the line after an insert or delete.
    ///
    /// `erased` trailing cells are blanked (the line got shorter by that much),
    /// then the terminal cursor is walked back to match the input cursor.
    pub(crate) fn redraw_tail(&mut self, erased: usize) -> io::Result<()> {
        let tail = self.input.after_cursor();
        let mut bytes = Vec::with_capacity(2 * (tail.len() + erased));
        bytes.extend_from_slice(tail);
        bytes.extend(std::iter::repeat_n(b' ', erased));
        bytes.extend(std::iter::repeat_n(b'\x08', tail.len() + erased));
        self.write(&bytes)
    }

    /// Repaints the whole input line. `from_cursor` is where the terminal cursor
    /// sits on the line before the repaint.
    ///
    /// In Visual mode the selected bytes are drawn in reverse video.
    pub(crate) fn redraw_line(&mut self, from_cursor: usize) -> io::Result<()> {
        let line = self.input.as_bytes();
        let mut bytes = Vec::with_capacity(from_cursor + line.len() + 16);
        bytes.extend(std::iter::repeat_n(b'\x08', from_cursor));
        match self.selection() {
            Some((start, end)) => {
                bytes.extend_from_slice(&line[..start]);
                bytes.extend_from_slice(REVERSE_VIDEO);
                bytes.extend_from_slice(&line[start..end]);
                bytes.extend_from_slice(RESET_ATTRIBUTES);
                bytes.extend_from_slice(&line[end..]);
            }
            None => bytes.extend_from_slice(line),
        }
        bytes.extend_from_slice(b"\x1b[K");
        bytes.extend(std::iter::repeat_n(b'\x08', self.input.after_cursor().len()));
        self.write(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestTerminal;

    #[test]
    fn test_new_screen_invariants() {
        let screen = Screen::new(TestTerminal::empty(), Mode::Normal);
        assert_eq!(screen.mode(), Mode::Normal);
        assert_eq!(screen.input().cursor(), 0);
        assert_eq!(screen.output().cursor(), 0);
        assert!(screen.history().is_empty());
        assert!(screen.current_command().is_empty());
        assert_eq!(screen.selection(), None);
    }

    #[test]
    fn test_read_key_uses_handle() {
        let mut screen = Screen::new(TestTerminal::with_input(&[0x1b, 0x5b, 0x41]), Mode::Normal);
        assert_eq!(screen.read_key().unwrap(), Key::Up);
    }

    #[test]
    fn test_write_key_is_flushed_immediately() {
        let mut screen = Screen::new(TestTerminal::empty(), Mode::Normal);
        screen.write_key(Key::Char(b'x')).unwrap();
        assert_eq!(screen.handle().written(), b"x");
        assert_eq!(screen.handle().flushes, 1);
    }

    #[test]
    fn test_redraw_line_highlights_selection() {
        let mut screen = Screen::new(TestTerminal::empty(), Mode::Normal);
        screen.input_mut().replace(b"abcd");
        screen.input_mut().set_cursor(1);
        screen.set_mode(Mode::Visual);
        screen.input_mut().set_cursor(2);
        screen.redraw_line(1).unwrap();
        assert_eq!(
            screen.handle().written(),
            b"\x08a\x1b[7mbc\x1b[0md\x1b[K\x08\x08"
        );

        screen.handle_mut().clear();
        screen.set_mode(Mode::Normal);
        screen.redraw_line(2).unwrap();
        assert_eq!(screen.handle().written(), b"\x08\x08abcd\x1b[K\x08\x08");
    }

    #[test]
    fn test_selection_includes_cursor_byte() {
        let mut screen = Screen::new(TestTerminal::empty(), Mode::Normal);
        screen.input_mut().replace(b"hello");
        screen.input_mut().set_cursor(1);
        screen.set_mode(Mode::Visual);
        screen.input_mut().set_cursor(3);
        assert_eq!(screen.selection(), Some((1, 4)));
        screen.input_mut().set_cursor(0);
        assert_eq!(screen.selection(), Some((0, 2)));
        screen.set_mode(Mode::Normal);
        assert_eq!(screen.selection(), None);
    }

    #[test]
    fn test_selection_on_empty_line_is_empty() {
        let mut screen = Screen::new(TestTerminal::empty(), Mode::Normal);
        screen.set_mode(Mode::Visual);
        assert_eq!(screen.selection(), Some((0, 0)));
    }

    #[test]
    fn test_history_navigation() {
        let mut screen = Screen::new(TestTerminal::empty(), Mode::Insert);
        assert_eq!(screen.history_prev(), None);
        screen.record_command(b"one");
        screen.record_command(b"");
        screen.record_command(b"two");
        assert_eq!(screen.history(), ["one", "two"]);
        assert_eq!(screen.current_command(), b"two");

        assert_eq!(screen.history_prev().as_deref(), Some("two"));
        assert_eq!(screen.history_prev().as_deref(), Some("one"));
        assert_eq!(screen.history_prev(), None);
        assert_eq!(screen.history_next().as_deref(), Some("two"));
        assert_eq!(screen.history_next().as_deref(), Some(""));
        assert_eq!(screen.history_next(), None);
    }

    #[test]
    fn test_redraw_tail_after_insert() {
        let mut screen = Screen::new(TestTerminal::empty(), Mode::Insert);
        screen.input_mut().replace(b"ac");
        screen.input_mut().set_cursor(1);
        screen.input_mut().insert(b'b');
        screen.redraw_tail(0).unwrap();
        assert_eq!(screen.handle().written(), b"c\x08");
    }

    #[test]
    fn test_redraw_line() {
        let mut screen = Screen::new(TestTerminal::empty(), Mode::Insert);
        screen.input_mut().replace(b"abc");
        screen.input_mut().set_cursor(2);
        screen.redraw_line(1).unwrap();
        assert_eq!(screen.handle().written(), b"\x08abc\x1b[K\x08");
    }
}
