//! HAL: a modal shell over a raw terminal, feeding a chat thread.

pub mod chat;
pub mod core;
pub mod editor;
pub mod shell;

#[cfg(test)]
pub mod test_support;
