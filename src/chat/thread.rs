//! # Chat Threads
//!
//! A thread is the conversation handed to the chat-completion client: an
//! ordered list of role-tagged messages plus some metadata for listing it.
//! Lines submitted in the shell are staged here as user messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Thread {
    pub id: String,
    pub name: String,
    pub summary: String,
    #[serde(rename = "date")]
    pub created: DateTime<Utc>,
    /// Initial text shown when the thread is opened.
    pub prompt: String,
    pub chat_history: Vec<ChatMessage>,
    /// Estimated tokens across the whole history, kept current on every change.
    pub tokens: usize,
}

impl Thread {
    /// Creates a thread whose history starts with the system message.
    pub fn new(name: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        let mut thread = Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            summary: String::new(),
            created: Utc::now(),
            prompt: String::new(),
            chat_history: vec![ChatMessage::new(Role::System, system_prompt)],
            tokens: 0,
        };
        thread.recount();
        thread
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.chat_history.push(ChatMessage::new(Role::User, content));
        self.recount();
    }

    pub fn message_count(&self) -> usize {
        self.chat_history.len()
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.chat_history.last()
    }

    /// Drops everything except the system message and the latest message.
    ///
    /// Threads with two or fewer messages are left alone.
    pub fn truncate(&mut self) {
        if self.chat_history.len() <= 2 {
            return;
        }
        let Some(last) = self.chat_history.pop() else {
            return;
        };
        let system = self
            .chat_history
            .iter()
            .find(|m| m.role == Role::System)
            .cloned();
        self.chat_history.clear();
        self.chat_history.extend(system);
        self.chat_history.push(last);
        self.recount();
    }

    fn recount(&mut self) {
        self.tokens = self
            .chat_history
            .iter()
            .map(|m| count_tokens(&m.content))
            .sum();
    }
}

/// Rough token estimate: the number of whitespace separated fields.
pub fn count_tokens(text: &str) -> usize {
    text.split_whitespace().count()
}
