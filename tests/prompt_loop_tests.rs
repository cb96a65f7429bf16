use std::io::{self, Cursor, Read, Write};

use hal::chat::{Role, Thread};
use hal::core::{DispatchError, Key, Mode, Screen, read_key};
use hal::editor::{EditorError, ExternalEditor};
use hal::shell::{PromptError, TerminalMode, start_prompt};

// ============================================================================
// Helpers
// ============================================================================

/// Scripted keyboard on the read side, captured screen on the write side.
struct FakeTty {
    keys: Cursor<Vec<u8>>,
    screen: Vec<u8>,
    broken: bool,
}

impl FakeTty {
    fn new(keys: &[u8]) -> Self {
        Self {
            keys: Cursor::new(keys.to_vec()),
            screen: Vec::new(),
            broken: false,
        }
    }

    /// A terminal that has gone away: every write fails.
    fn disconnected(keys: &[u8]) -> Self {
        Self {
            broken: true,
            ..Self::new(keys)
        }
    }
}

impl Read for FakeTty {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.keys.read(buf)
    }
}

impl Write for FakeTty {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.broken {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal gone"));
        }
        self.screen.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Records every raw-mode call in order.
#[derive(Default)]
struct RecordingMode {
    calls: Vec<&'static str>,
}

impl TerminalMode for RecordingMode {
    fn enable_raw(&mut self) -> io::Result<()> {
        self.calls.push("raw");
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        self.calls.push("restore");
        Ok(())
    }
}

/// Uppercases whatever it is given, like a user rewriting the line.
struct ShoutingEditor;

impl ExternalEditor for ShoutingEditor {
    fn edit(&mut self, initial: &str) -> Result<String, EditorError> {
        Ok(format!("{}\n", initial.to_uppercase()))
    }
}

fn run_session(keys: &[u8]) -> (PromptError, FakeTty, RecordingMode, Thread) {
    run_on(FakeTty::new(keys))
}

fn run_on(mut tty: FakeTty) -> (PromptError, FakeTty, RecordingMode, Thread) {
    let mut mode = RecordingMode::default();
    let mut thread = Thread::new("Get to know HAL", "You are HAL.");
    let Err(err) = start_prompt(&mut tty, &mut mode, &mut ShoutingEditor, &mut thread);
    (err, tty, mode, thread)
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[test]
fn test_echo_then_interrupt() {
    let (err, tty, mode, _) = run_session(&[b'A', 0x1b, 0x5b, 0x43, 0x03]);

    assert!(matches!(err, PromptError::Interrupted { mode: Mode::Normal }));
    assert_eq!(tty.screen, b"A\x1b[C");
    assert_eq!(mode.calls, vec!["raw", "restore"]);
}

#[test]
fn test_read_error_restores_terminal_once() {
    // Input ends halfway through an escape sequence.
    let (err, tty, mode, _) = run_session(&[b'x', 0x1b, 0x5b]);

    match &err {
        PromptError::Dispatch { mode, source: DispatchError::Read(_) } => {
            assert_eq!(*mode, Mode::Normal)
        }
        other => panic!("expected read failure, got {other:?}"),
    }
    assert!(err.to_string().starts_with("error handling Normal mode"));
    assert_eq!(tty.screen, b"x");
    assert_eq!(mode.calls, vec!["raw", "restore"]);
}

#[test]
fn test_write_error_restores_terminal_once() {
    let (err, tty, mode, _) = run_on(FakeTty::disconnected(b"A\x03"));

    match &err {
        PromptError::Dispatch { mode, source: DispatchError::Write(e) } => {
            assert_eq!(*mode, Mode::Normal);
            assert_eq!(e.kind(), io::ErrorKind::BrokenPipe);
        }
        other => panic!("expected write failure, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "error handling Normal mode: failed to write to terminal: terminal gone"
    );
    assert!(tty.screen.is_empty());
    assert_eq!(mode.calls, vec!["raw", "restore"]);
}

#[test]
fn test_unknown_sequences_never_abort() {
    // ESC O P (F1 in SS3 form): 'O' comes out as a literal, then 'P' on its own.
    // ESC [ Z (back-tab): 'Z' comes out as a literal.
    let (err, tty, _, _) = run_session(b"\x1bOP\x1b[Z\x03");
    assert!(err.is_interrupted());
    assert_eq!(tty.screen, b"OPZ");
}

#[test]
fn test_insert_edit_submit_and_quit() {
    // Ctrl-A: Insert; type "helo", Left, "l", Enter; Ctrl-C: Normal; Ctrl-C: quit.
    let (err, tty, _, thread) = run_session(b"\x01helo\x1b[Dl\r\x03\x03");

    assert!(err.is_interrupted());
    assert_eq!(thread.message_count(), 2);
    assert_eq!(thread.chat_history[1].role, Role::User);
    assert_eq!(thread.chat_history[1].content, "hello");
    assert!(tty.screen.ends_with(b"\r\n"));
}

#[test]
fn test_ctrl_e_round_trips_through_editor() {
    let (err, _, _, thread) = run_session(b"\x01open the pod bay doors\x05\r\x03\x03");

    assert!(err.is_interrupted());
    assert_eq!(thread.chat_history[1].content, "OPEN THE POD BAY DOORS");
}

#[test]
fn test_history_recall_resubmits() {
    let (_, _, _, thread) = run_session(b"\x01status\r\x1b[A\r\x03\x03");

    let users: Vec<&str> = thread
        .chat_history
        .iter()
        .filter(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(users, vec!["status", "status"]);
}

#[test]
fn test_ctrl_t_truncates_from_normal_mode() {
    // Three submissions, back to Normal, Ctrl-T, quit.
    let (err, tty, _, thread) = run_session(b"\x01one\rtwo\rthree\r\x03\x14\x03");

    assert!(err.is_interrupted());
    assert_eq!(thread.message_count(), 2);
    assert_eq!(thread.chat_history[0].role, Role::System);
    assert_eq!(thread.chat_history[1].content, "three");
    // Ctrl-T is consumed, not echoed.
    assert!(!tty.screen.contains(&0x14));
}

#[test]
fn test_visual_cut_then_submit_remainder() {
    // Insert "abcdef", Ctrl-A to line start, Ctrl-V, Right x2, d, back to Insert, submit.
    let (_, _, _, thread) = run_session(b"\x01abcdef\x01\x16\x1b[C\x1b[Cd\x01\r\x03\x03");
    assert_eq!(thread.chat_history[1].content, "def");
}

// ============================================================================
// Screen over a fake terminal
// ============================================================================

#[test]
fn test_fresh_screen_state() {
    let screen = Screen::new(FakeTty::new(&[]), Mode::Normal);
    assert_eq!(screen.mode(), Mode::Normal);
    assert_eq!(screen.input().cursor(), 0);
    assert_eq!(screen.output().cursor(), 0);
    assert!(screen.history().is_empty());
}

#[test]
fn test_decoder_on_shared_stream() {
    let mut stream = Cursor::new(b"\x7f\x1b[A\x1b[B\x1b[C\x1b[D\r".to_vec());
    let keys: Vec<Key> = std::iter::from_fn(|| read_key(&mut stream).ok()).collect();
    assert_eq!(
        keys,
        vec![Key::Backspace, Key::Up, Key::Down, Key::Right, Key::Left, Key::Enter]
    );
    assert_eq!(Key::Backspace.to_string(), "\x08 \x08");
}
