//! `$EDITOR` subprocess editor.
//!
//! The buffer goes into a `hal-editor-*` temp file, the editor runs as a
//! blocking child with the terminal handed back to cooked mode, and the file is
//! read back in full. The temp file is removed when it drops, whatever happened.

use std::fs;
use std::io::Write;
use std::process::Command;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::{debug, info, warn};
use tempfile::NamedTempFile;

use super::{EditorError, ExternalEditor};

pub struct CommandEditor {
    program: String,
    /// Whether to leave raw mode while the child owns the terminal.
    manage_raw_mode: bool,
}

impl CommandEditor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            manage_raw_mode: true,
        }
    }

    /// An editor that leaves the terminal mode alone (non-interactive programs).
    pub fn detached(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            manage_raw_mode: false,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, path: &std::path::Path) -> Result<(), EditorError> {
        // EDITOR may carry arguments, e.g. "code --wait".
        let mut parts = self.program.split_whitespace();
        let binary = parts.next().unwrap_or(super::DEFAULT_EDITOR);

        let status = Command::new(binary)
            .args(parts)
            .arg(path)
            .status()
            .map_err(|source| EditorError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(EditorError::Exit {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}

impl ExternalEditor for CommandEditor {
    fn edit(&mut self, initial: &str) -> Result<String, EditorError> {
        let mut file = tempfile::Builder::new()
            .prefix("hal-editor-")
            .tempfile()
            .map_err(EditorError::Io)?;
        file.write_all(initial.as_bytes())?;
        file.flush()?;

        info!("Opening {} in {}", file.path().display(), self.program);

        if self.manage_raw_mode {
            disable_raw_mode()?;
        }
        let result = self.run(file.path());
        if self.manage_raw_mode {
            if let Err(e) = enable_raw_mode() {
                warn!("Failed to re-enter raw mode after editor: {}", e);
                return Err(EditorError::Io(e));
            }
        }
        result?;

        let contents = read_back(&file)?;
        debug!("Editor returned {} bytes", contents.len());
        Ok(contents)
    }
}

fn read_back(file: &NamedTempFile) -> Result<String, EditorError> {
    let bytes = fs::read(file.path())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
