//! Operating modes of the shell.

use std::fmt;

/// The mode decides how a decoded key is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Waiting for a command. Keys are echoed back to the terminal.
    #[default]
    Normal,
    /// Editing the input line at the cursor.
    Insert,
    /// Selecting a range of the input line. The cursor moves, the anchor stays.
    Visual,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Normal => "Normal",
            Mode::Insert => "Insert",
            Mode::Visual => "Visual",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
