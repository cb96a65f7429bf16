//! # External Editor
//!
//! Hands a text buffer to the user's editor and returns what they saved.
//! The shell only sees the [`ExternalEditor`] trait; [`CommandEditor`] is the
//! `$EDITOR` subprocess implementation used by the binary.

pub mod external;

use std::fmt;
use std::io;
use std::process::ExitStatus;

pub use external::CommandEditor;

/// Editor used when neither config nor `$EDITOR` name one.
pub const DEFAULT_EDITOR: &str = "vim";

/// Errors that can occur while round-tripping text through an editor.
#[derive(Debug)]
pub enum EditorError {
    /// Temp file could not be created, written or read back.
    Io(io::Error),
    /// The editor program could not be started.
    Spawn { program: String, source: io::Error },
    /// The editor exited unsuccessfully; the buffer is discarded.
    Exit { program: String, status: ExitStatus },
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::Io(e) => write!(f, "editor I/O error: {e}"),
            EditorError::Spawn { program, source } => {
                write!(f, "failed to start editor {program:?}: {source}")
            }
            EditorError::Exit { program, status } => {
                write!(f, "editor {program:?} exited with {status}")
            }
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditorError::Io(e) => Some(e),
            EditorError::Spawn { source, .. } => Some(source),
            EditorError::Exit { .. } => None,
        }
    }
}

impl From<io::Error> for EditorError {
    fn from(e: io::Error) -> Self {
        EditorError::Io(e)
    }
}

pub trait ExternalEditor {
    /// Opens `initial` in the editor and blocks until it exits, returning the
    /// saved contents.
    fn edit(&mut self, initial: &str) -> Result<String, EditorError>;
}
