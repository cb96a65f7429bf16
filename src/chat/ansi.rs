//! Removal of ANSI escape sequences from terminal text.

const ESC: char = '\u{1b}';
const CSI_8BIT: char = '\u{9b}';
const BEL: char = '\u{07}';

enum State {
    Text,
    /// Saw ESC, waiting for the sequence type.
    Escape,
    /// Inside `ESC [` / `0x9b`, until a final byte in `@..=~`.
    Csi,
    /// Inside `ESC ]`, until BEL or `ESC \`.
    Osc,
    /// Saw ESC inside an OSC string.
    OscEscape,
}

/// Strips CSI, OSC and two-character escape sequences, keeping everything else.
///
/// An unterminated sequence at the end of the input is dropped.
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = State::Text;

    for c in text.chars() {
        state = match state {
            State::Text => match c {
                ESC => State::Escape,
                CSI_8BIT => State::Csi,
                _ => {
                    out.push(c);
                    State::Text
                }
            },
            State::Escape => match c {
                '[' => State::Csi,
                ']' => State::Osc,
                _ => State::Text,
            },
            State::Csi => {
                if ('@'..='~').contains(&c) {
                    State::Text
                } else {
                    State::Csi
                }
            }
            State::Osc => match c {
                BEL => State::Text,
                ESC => State::OscEscape,
                _ => State::Osc,
            },
            State::OscEscape => match c {
                '\\' => State::Text,
                _ => State::Osc,
            },
        };
    }

    out
}
