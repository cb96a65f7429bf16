//! Terminal mode management and the process terminal handle.

use std::io::{self, Read, Write};

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::{info, warn};

/// Switches a terminal between raw and its previous configuration.
pub trait TerminalMode {
    /// Enters raw mode, remembering the configuration to go back to.
    fn enable_raw(&mut self) -> io::Result<()>;
    /// Puts back the configuration saved by `enable_raw`.
    fn restore(&mut self) -> io::Result<()>;
}

/// Raw mode through crossterm, which keeps the original termios itself.
#[derive(Debug, Default)]
pub struct CrosstermTerminal;

impl TerminalMode for CrosstermTerminal {
    fn enable_raw(&mut self) -> io::Result<()> {
        enable_raw_mode()
    }

    fn restore(&mut self) -> io::Result<()> {
        disable_raw_mode()
    }
}

/// Holds the terminal in raw mode and restores it exactly once, either through
/// [`RawModeGuard::restore`] or on drop.
pub struct RawModeGuard<'a, M: TerminalMode + ?Sized> {
    terminal: &'a mut M,
    restored: bool,
}

impl<'a, M: TerminalMode + ?Sized> RawModeGuard<'a, M> {
    pub fn enable(terminal: &'a mut M) -> io::Result<Self> {
        terminal.enable_raw()?;
        info!("Terminal switched to raw mode");
        Ok(Self {
            terminal,
            restored: false,
        })
    }

    pub fn restore(mut self) -> io::Result<()> {
        self.restored = true;
        let result = self.terminal.restore();
        info!("Terminal restored");
        result
    }
}

impl<M: TerminalMode + ?Sized> Drop for RawModeGuard<'_, M> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        if let Err(e) = self.terminal.restore() {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}

/// Stdin for reading keys, stdout for echo, as a single handle.
pub struct StdTerminal {
    stdin: io::Stdin,
    stdout: io::Stdout,
}

impl StdTerminal {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
        }
    }
}

impl Default for StdTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Read for StdTerminal {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stdin.read(buf)
    }
}

impl Write for StdTerminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}
