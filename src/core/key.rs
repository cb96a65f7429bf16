//! # Key Decoding
//!
//! Turns the raw byte stream of a terminal in raw mode into discrete [`Key`]
//! events. Only the subset of ANSI escape sequences HAL actually uses is
//! recognised; anything else degrades to a literal key instead of failing.
//!
//! ```text
//! 0x1b 0x5b 0x41  →  Key::Up
//! 0x1b 0x5b 0x7a  →  Key::Char(b'z')     (unknown CSI final byte)
//! 0x1b 0x4f       →  Key::Char(b'O')     (not a CSI introducer)
//! 0x61            →  Key::Char(b'a')
//! ```
//!
//! Every call starts from a clean slate. Bytes already consumed when a read
//! fails mid-sequence are lost.

use std::fmt;
use std::io::{self, Read};

const ESC: u8 = 0x1b;
const CSI_BRACKET: u8 = 0x5b;

/// A single decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A literal byte. Printable when it falls in `0x20..=0x7e`.
    Char(u8),
    Enter,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Tab,
    Escape,
    CtrlA,
    CtrlB,
    CtrlC,
    CtrlD,
    CtrlE,
    CtrlT,
    CtrlV,
    CtrlZ,
}

impl Key {
    /// Maps a lone byte (not part of an escape sequence) to a key.
    fn from_byte(byte: u8) -> Key {
        match byte {
            0x7f => Key::Backspace,
            0x03 => Key::CtrlC,
            0x04 => Key::CtrlD,
            0x16 => Key::CtrlV,
            0x1a => Key::CtrlZ,
            0x0d => Key::Enter,
            0x01 => Key::CtrlA,
            0x02 => Key::CtrlB,
            0x05 => Key::CtrlE,
            0x09 => Key::Tab,
            0x14 => Key::CtrlT,
            other => Key::Char(other),
        }
    }

    /// Returns the printable byte carried by this key, if any.
    pub fn printable(&self) -> Option<u8> {
        match *self {
            Key::Char(b) if (0x20..=0x7e).contains(&b) => Some(b),
            _ => None,
        }
    }

    /// The exact byte sequence that reproduces this key on a terminal.
    ///
    /// Literal bytes outside the printable range render as a diagnostic
    /// placeholder such as `<unknown key:0x07>`.
    pub fn render(&self) -> Vec<u8> {
        match *self {
            Key::Enter => b"\r\n".to_vec(),
            Key::Backspace => b"\x08 \x08".to_vec(),
            Key::Delete => b"\x1b[3~".to_vec(),
            Key::Left => b"\x1b[D".to_vec(),
            Key::Right => b"\x1b[C".to_vec(),
            Key::Up => b"\x1b[A".to_vec(),
            Key::Down => b"\x1b[B".to_vec(),
            Key::Tab => b"\t".to_vec(),
            Key::Escape => vec![ESC],
            Key::CtrlA => vec![0x01],
            Key::CtrlB => vec![0x02],
            Key::CtrlC => vec![0x03],
            Key::CtrlD => vec![0x04],
            Key::CtrlE => vec![0x05],
            Key::CtrlT => vec![0x14],
            Key::CtrlV => vec![0x16],
            Key::CtrlZ => vec![0x1a],
            Key::Char(b) if (0x20..=0x7e).contains(&b) => vec![b],
            Key::Char(b) => format!("<unknown key:{b:#04x}>").into_bytes(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Every rendering is ASCII, so this is never lossy.
        f.write_str(&String::from_utf8_lossy(&self.render()))
    }
}

/// Failure while pulling bytes for a key off the terminal.
#[derive(Debug)]
pub enum DecodeError {
    /// The underlying read failed (including end of input).
    Read(io::Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Read(e) => write!(f, "failed to read key from terminal: {e}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Read(e) => Some(e),
        }
    }
}

fn read_byte<R: Read + ?Sized>(reader: &mut R) -> Result<u8, DecodeError> {
    let mut byte = [0u8; 1];
    reader.read_exact(&mut byte).map_err(DecodeError::Read)?;
    Ok(byte[0])
}

/// Reads exactly one key from `reader`, consuming between one and three bytes.
pub fn read_key<R: Read + ?Sized>(reader: &mut R) -> Result<Key, DecodeError> {
    let first = read_byte(reader)?;
    if first != ESC {
        return Ok(Key::from_byte(first));
    }

    let second = read_byte(reader)?;
    if second != CSI_BRACKET {
        return Ok(Key::Char(second));
    }

    let key = match read_byte(reader)? {
        b'A' => Key::Up,
        b'B' => Key::Down,
        b'C' => Key::Right,
        b'D' => Key::Left,
        other => {
            log::debug!("Unrecognized CSI final byte {other:#04x}, passing through as literal");
            Key::Char(other)
        }
    };
    Ok(key)
}
