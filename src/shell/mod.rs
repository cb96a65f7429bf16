//! # Shell
//!
//! The prompt loop: raw mode on, one key at a time through the mode state
//! machine, raw mode off. The loop has no normal exit. It ends when the user
//! interrupts from Normal mode or when something fails, and the terminal is
//! restored on every one of those paths before returning.
//!
//! Submitted lines are stripped of escape sequences and staged in the chat
//! thread as user messages for the chat client to pick up.

pub mod terminal;

use std::convert::Infallible;
use std::fmt;
use std::io::{self, Read, Write};

use log::{debug, error, info, warn};

use crate::chat::{Thread, count_tokens, strip_ansi};
use crate::core::{DispatchError, Mode, Outcome, Screen, dispatch};
use crate::editor::ExternalEditor;

pub use terminal::{CrosstermTerminal, RawModeGuard, StdTerminal, TerminalMode};

#[derive(Debug)]
pub enum PromptError {
    /// Ctrl-C in Normal mode. Expected; the binary exits with status 1.
    Interrupted { mode: Mode },
    /// Any other failure while handling a key.
    Dispatch { mode: Mode, source: DispatchError },
    /// Raw mode could not be entered.
    Terminal(io::Error),
}

impl PromptError {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, PromptError::Interrupted { .. })
    }
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::Interrupted { mode } => write!(f, "user interrupted in {mode} mode"),
            PromptError::Dispatch { mode, source } => {
                write!(f, "error handling {mode} mode: {source}")
            }
            PromptError::Terminal(e) => write!(f, "failed to enter raw mode: {e}"),
        }
    }
}

impl std::error::Error for PromptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PromptError::Interrupted { .. } => None,
            PromptError::Dispatch { source, .. } => Some(source),
            PromptError::Terminal(e) => Some(e),
        }
    }
}

/// Runs the modal shell over `handle` until it is interrupted or fails.
pub fn start_prompt<T, M>(
    handle: T,
    terminal: &mut M,
    editor: &mut dyn ExternalEditor,
    thread: &mut Thread,
) -> Result<Infallible, PromptError>
where
    T: Read + Write,
    M: TerminalMode + ?Sized,
{
    let guard = RawModeGuard::enable(terminal).map_err(PromptError::Terminal)?;

    let mut screen = Screen::new(handle, Mode::Normal);
    let err = run_loop(&mut screen, editor, thread);

    if let Err(e) = guard.restore() {
        warn!("Failed to restore terminal after prompt loop: {}", e);
    }
    Err(err)
}

fn run_loop<T: Read + Write>(
    screen: &mut Screen<T>,
    editor: &mut dyn ExternalEditor,
    thread: &mut Thread,
) -> PromptError {
    loop {
        let mode = screen.mode();
        match dispatch(screen, editor) {
            Ok(Outcome::Handled) => {}
            Ok(Outcome::Ignored(key)) => debug!("{:?} ignored in {} mode", key, mode),
            Ok(Outcome::Switched { from, to }) => info!("Switched from {} to {} mode", from, to),
            Ok(Outcome::Submitted(line)) => stage(thread, &line),
            Ok(Outcome::TruncateThread) => {
                thread.truncate();
                info!(
                    "Truncated thread {:?} to {} messages (~{} tokens)",
                    thread.name,
                    thread.message_count(),
                    thread.tokens
                );
            }
            Err(DispatchError::Interrupted) => {
                info!("User interrupted in {} mode", mode);
                return PromptError::Interrupted { mode };
            }
            Err(source) => {
                error!("Error handling {} mode: {}", mode, source);
                return PromptError::Dispatch { mode, source };
            }
        }
    }
}

fn stage(thread: &mut Thread, line: &str) {
    let text = strip_ansi(line);
    if text.trim().is_empty() {
        return;
    }
    let tokens = count_tokens(&text);
    thread.push_user(text);
    info!(
        "Staged message {} in thread {:?} (~{} tokens, ~{} in thread)",
        thread.message_count(),
        thread.name,
        tokens,
        thread.tokens
    );
}
