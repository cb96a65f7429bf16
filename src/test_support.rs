//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::io::{self, Cursor, Read, Write};

use crate::editor::{EditorError, ExternalEditor};
use crate::shell::TerminalMode;

/// In-memory terminal: scripted input bytes, captured output.
pub struct TestTerminal {
    input: Cursor<Vec<u8>>,
    output: Vec<u8>,
    pub flushes: usize,
}

impl TestTerminal {
    pub fn empty() -> Self {
        Self::with_input(&[])
    }

    pub fn with_input(bytes: &[u8]) -> Self {
        Self {
            input: Cursor::new(bytes.to_vec()),
            output: Vec::new(),
            flushes: 0,
        }
    }

    pub fn written(&self) -> &[u8] {
        &self.output
    }

    pub fn clear(&mut self) {
        self.output.clear();
    }
}

impl Read for TestTerminal {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for TestTerminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

/// Counts raw-mode transitions instead of touching a real tty.
#[derive(Default)]
pub struct CountingTerminal {
    pub enabled: usize,
    pub restored: usize,
    fail_enable: bool,
}

impl CountingTerminal {
    pub fn failing_enable() -> Self {
        Self {
            fail_enable: true,
            ..Default::default()
        }
    }
}

impl TerminalMode for CountingTerminal {
    fn enable_raw(&mut self) -> io::Result<()> {
        if self.fail_enable {
            return Err(io::Error::other("not a tty"));
        }
        self.enabled += 1;
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        self.restored += 1;
        Ok(())
    }
}

/// Editor that records what it was given and answers from a script.
pub struct ScriptedEditor {
    reply: Option<String>,
    pub seen: Vec<String>,
}

impl ScriptedEditor {
    pub fn returning(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            seen: Vec::new(),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            seen: Vec::new(),
        }
    }
}

impl ExternalEditor for ScriptedEditor {
    fn edit(&mut self, initial: &str) -> Result<String, EditorError> {
        self.seen.push(initial.to_string());
        self.reply.clone().ok_or_else(|| {
            EditorError::Io(io::Error::new(io::ErrorKind::NotFound, "no editor"))
        })
    }
}
