//! # Mode State Machine
//!
//! One handler per [`Mode`], each total over [`Key`]. A key a mode has no use
//! for comes back as [`Outcome::Ignored`]; it never falls through to another
//! mode's behaviour. Mode changes are always reported as
//! [`Outcome::Switched`].
//!
//! | Key          | Normal        | Insert             | Visual          |
//! |--------------|---------------|--------------------|-----------------|
//! | Ctrl-C       | interrupt     | → Normal           | → Normal        |
//! | Ctrl-A       | → Insert      | line start         | line start      |
//! | Ctrl-V       | → Visual      | → Visual           | → Normal        |
//! | Enter        | echo          | submit line        | ignored         |
//! | Ctrl-E       | echo          | edit in `$EDITOR`  | ignored         |
//! | Ctrl-T       | truncate      | truncate           | ignored         |
//! | `y` / `d`    | echo          | insert             | yank / cut      |
//! | anything else| echo          | edit the line      | ignored         |
//!
//! The decoder never yields [`Key::Escape`] or [`Key::Delete`] (`ESC q` comes
//! out as a literal `q`), so from the keyboard Ctrl-C is the only way back to
//! Normal. The Escape arms only fire for keys fed through [`apply_key`].
//!
//! In Visual mode the selected bytes are drawn in reverse video and the line
//! is repainted on every cursor move.

use std::fmt;
use std::io::{self, Read, Write};

use log::{debug, info, warn};

use super::key::{DecodeError, Key};
use super::mode::Mode;
use super::screen::Screen;
use crate::chat::strip_ansi;
use crate::editor::ExternalEditor;

/// What a dispatched key did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    /// The key means nothing in the current mode.
    Ignored(Key),
    Switched { from: Mode, to: Mode },
    /// A line was submitted from Insert mode.
    Submitted(String),
    /// Ctrl-T: drop the chat history down to the system and latest message.
    TruncateThread,
}

#[derive(Debug)]
pub enum DispatchError {
    /// Ctrl-C in Normal mode. The only graceful way out of the loop.
    Interrupted,
    Read(DecodeError),
    Write(io::Error),
}

impl DispatchError {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, DispatchError::Interrupted)
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Interrupted => write!(f, "user interrupted"),
            DispatchError::Read(e) => write!(f, "{e}"),
            DispatchError::Write(e) => write!(f, "failed to write to terminal: {e}"),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Interrupted => None,
            DispatchError::Read(e) => Some(e),
            DispatchError::Write(e) => Some(e),
        }
    }
}

impl From<io::Error> for DispatchError {
    fn from(e: io::Error) -> Self {
        DispatchError::Write(e)
    }
}

impl From<DecodeError> for DispatchError {
    fn from(e: DecodeError) -> Self {
        DispatchError::Read(e)
    }
}

/// Reads one key from the screen and runs it through the current mode.
pub fn dispatch<T: Read + Write>(
    screen: &mut Screen<T>,
    editor: &mut dyn ExternalEditor,
) -> Result<Outcome, DispatchError> {
    let key = screen.read_key()?;
    debug!("Key {:?} in {} mode", key, screen.mode());
    apply_key(screen, key, editor)
}

/// Runs an already decoded key through the current mode.
pub fn apply_key<T: Write>(
    screen: &mut Screen<T>,
    key: Key,
    editor: &mut dyn ExternalEditor,
) -> Result<Outcome, DispatchError> {
    match screen.mode() {
        Mode::Normal => handle_normal(screen, key),
        Mode::Insert => handle_insert(screen, key, editor),
        Mode::Visual => handle_visual(screen, key),
    }
}

fn switch<T>(screen: &mut Screen<T>, to: Mode) -> Outcome {
    let from = screen.mode();
    screen.set_mode(to);
    Outcome::Switched { from, to }
}

fn handle_normal<T: Write>(screen: &mut Screen<T>, key: Key) -> Result<Outcome, DispatchError> {
    match key {
        Key::CtrlC => Err(DispatchError::Interrupted),
        Key::CtrlA => Ok(switch(screen, Mode::Insert)),
        Key::CtrlV => enter_visual(screen),
        Key::CtrlT => Ok(Outcome::TruncateThread),
        other => {
            screen.write_key(other)?;
            Ok(Outcome::Handled)
        }
    }
}

fn handle_insert<T: Write>(
    screen: &mut Screen<T>,
    key: Key,
    editor: &mut dyn ExternalEditor,
) -> Result<Outcome, DispatchError> {
    match key {
        Key::Char(_) => {
            let Some(byte) = key.printable() else {
                return Ok(Outcome::Ignored(key));
            };
            screen.input_mut().insert(byte);
            screen.write(&[byte])?;
            if !screen.input().after_cursor().is_empty() {
                screen.redraw_tail(0)?;
            }
        }
        Key::Backspace => {
            if screen.input_mut().backspace() {
                screen.write(b"\x08")?;
                screen.redraw_tail(1)?;
            }
        }
        Key::CtrlD | Key::Delete => {
            if screen.input_mut().delete() {
                screen.redraw_tail(1)?;
            }
        }
        Key::Left | Key::CtrlB => move_left(screen)?,
        Key::Right => move_right(screen)?,
        Key::CtrlA => move_home(screen)?,
        Key::Up => {
            if let Some(line) = screen.history_prev() {
                replace_line(screen, line.as_bytes())?;
            }
        }
        Key::Down => {
            if let Some(line) = screen.history_next() {
                replace_line(screen, line.as_bytes())?;
            }
        }
        Key::Enter => return submit(screen),
        Key::CtrlE => edit_input(screen, editor)?,
        Key::CtrlV => return enter_visual(screen),
        Key::CtrlT => return Ok(Outcome::TruncateThread),
        Key::CtrlC | Key::Escape => return Ok(switch(screen, Mode::Normal)),
        Key::Tab | Key::CtrlZ => return Ok(Outcome::Ignored(key)),
    }
    Ok(Outcome::Handled)
}

fn handle_visual<T: Write>(screen: &mut Screen<T>, key: Key) -> Result<Outcome, DispatchError> {
    let from = screen.input().cursor();
    let drawn = !screen.input().is_empty();
    let moved = match key {
        Key::Left | Key::CtrlB => screen.input_mut().move_left(),
        Key::Right => screen.input_mut().move_right(),
        Key::CtrlA => screen.input_mut().move_home() > 0,
        Key::Char(b'y') => {
            let (start, end) = selection_or_cursor(screen);
            let selected = screen.input().range(start, end).to_vec();
            info!("Yanked {} bytes", selected.len());
            screen.output_mut().replace(&selected);
            return leave_visual(screen, from, drawn);
        }
        Key::Char(b'd') | Key::Char(b'x') => {
            let (start, end) = selection_or_cursor(screen);
            let removed = screen.input_mut().remove_range(start, end);
            info!("Cut {} bytes", removed.len());
            screen.output_mut().replace(&removed);
            return leave_visual(screen, from, drawn);
        }
        Key::CtrlC | Key::CtrlV | Key::Escape => return leave_visual(screen, from, drawn),
        other => return Ok(Outcome::Ignored(other)),
    };
    if moved {
        screen.redraw_line(from)?;
    }
    Ok(Outcome::Handled)
}

fn enter_visual<T: Write>(screen: &mut Screen<T>) -> Result<Outcome, DispatchError> {
    let outcome = switch(screen, Mode::Visual);
    if !screen.input().is_empty() {
        let cursor = screen.input().cursor();
        screen.redraw_line(cursor)?;
    }
    Ok(outcome)
}

/// Switches to Normal and, if the line was on screen, repaints it without the highlight.
fn leave_visual<T: Write>(
    screen: &mut Screen<T>,
    from: usize,
    drawn: bool,
) -> Result<Outcome, DispatchError> {
    let outcome = switch(screen, Mode::Normal);
    if drawn {
        screen.redraw_line(from)?;
    }
    Ok(outcome)
}

fn selection_or_cursor<T>(screen: &Screen<T>) -> (usize, usize) {
    screen.selection().unwrap_or_else(|| {
        let cursor = screen.input().cursor();
        (cursor, cursor)
    })
}

fn move_left<T: Write>(screen: &mut Screen<T>) -> io::Result<()> {
    if screen.input_mut().move_left() {
        screen.write_key(Key::Left)?;
    }
    Ok(())
}

fn move_right<T: Write>(screen: &mut Screen<T>) -> io::Result<()> {
    if screen.input_mut().move_right() {
        screen.write_key(Key::Right)?;
    }
    Ok(())
}

fn move_home<T: Write>(screen: &mut Screen<T>) -> io::Result<()> {
    let travelled = screen.input_mut().move_home();
    if travelled > 0 {
        screen.write(&vec![b'\x08'; travelled])?;
    }
    Ok(())
}

fn replace_line<T: Write>(screen: &mut Screen<T>, line: &[u8]) -> io::Result<()> {
    let from = screen.input().cursor();
    screen.input_mut().replace(line);
    screen.redraw_line(from)
}

fn submit<T: Write>(screen: &mut Screen<T>) -> Result<Outcome, DispatchError> {
    let line = screen.input_mut().take();
    screen.write_key(Key::Enter)?;
    screen.record_command(&line);
    if line.is_empty() {
        return Ok(Outcome::Handled);
    }

    let output = screen.output_mut();
    output.append(&line);
    output.append(b"\n");

    let text = String::from_utf8_lossy(&line).into_owned();
    info!("Submitted command ({} bytes)", text.len());
    Ok(Outcome::Submitted(text))
}

/// Round-trips the input line through the external editor.
///
/// Editor failures do not end the session: the error is shown on its own line
/// and kept in the output region, and the line is left as it was.
fn edit_input<T: Write>(screen: &mut Screen<T>, editor: &mut dyn ExternalEditor) -> io::Result<()> {
    let initial = screen.input().to_string_lossy();
    match editor.edit(&initial) {
        Ok(text) => {
            let line = single_line(&text);
            screen.input_mut().replace(&line);
        }
        Err(e) => {
            warn!("External editor failed: {}", e);
            let message = format!("[editor] {e}");
            screen.output_mut().append(message.as_bytes());
            screen.output_mut().append(b"\n");
            screen.write(b"\r\n")?;
            screen.write(message.as_bytes())?;
        }
    }
    // The editor owned the terminal; start the line over.
    screen.write(b"\r\n")?;
    screen.redraw_line(0)
}

/// Flattens editor output into something Insert mode could have typed.
///
/// Escape sequences are stripped, line breaks and tabs become spaces and any
/// other non-printable byte is dropped.
fn single_line(text: &str) -> Vec<u8> {
    strip_ansi(text)
        .trim_end_matches(['\r', '\n'])
        .bytes()
        .filter_map(|b| match b {
            b'\r' | b'\n' | b'\t' => Some(b' '),
            other => Key::Char(other).printable(),
        })
        .collect()
}
