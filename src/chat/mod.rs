//! # Chat
//!
//! The conversation model handed to the chat-completion client. The client
//! itself (network, retries, rendering replies) lives outside this crate.

pub mod ansi;
pub mod thread;

pub use ansi::strip_ansi;
pub use thread::{ChatMessage, Role, Thread, count_tokens};
