//! # Core
//!
//! The raw-terminal input pipeline. Bytes come in, keys come out, and the
//! current mode decides what each key does to the screen.
//!
//! ```text
//!   terminal bytes
//!         │
//!         ▼
//!   ┌────────────┐     ┌──────────────────┐     ┌────────────────────┐
//!   │  key.rs    │ ──► │  dispatch.rs     │ ──► │  screen.rs         │
//!   │  decoder   │ Key │  Normal/Insert/  │     │  buffers, history, │
//!   └────────────┘     │  Visual handlers │     │  terminal writes   │
//!                      └──────────────────┘     └────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`key`]: `Key` and the escape-sequence decoder
//! - [`buffer`]: `CursorBuffer`, a byte buffer with a clamped cursor
//! - [`mode`]: the closed set of modes
//! - [`screen`]: `Screen`, the aggregate every handler works on
//! - [`dispatch`]: the mode state machine
//! - [`config`]: settings file, env and CLI resolution

pub mod buffer;
pub mod config;
pub mod dispatch;
pub mod key;
pub mod mode;
pub mod screen;

pub use buffer::CursorBuffer;
pub use dispatch::{DispatchError, Outcome, apply_key, dispatch};
pub use key::{DecodeError, Key, read_key};
pub use mode::Mode;
pub use screen::Screen;
