//! Conversation state types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    User,
    Model,
}

impl Author {
    /// Label shown above the message in the conversation log
    pub fn display_name(self) -> &'static str {
        match self {
            Author::User => "Your Question",
            Author::Model => "Oracle of Delphi",
        }
    }
}

/// A single entry in the conversation log. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    author: Author,
    text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            author: Author::Model,
            text: text.into(),
        }
    }

    pub fn author(&self) -> Author {
        self.author
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Observable state of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConversationState {
    /// Nothing asked yet
    #[default]
    Initial,

    /// Messages oldest first; `pending` while the model is working
    Active { messages: Vec<Message>, pending: bool },

    /// Generation failed
    Error {
        last_messages: Vec<Message>,
        error_text: String,
    },
}

impl ConversationState {
    pub fn messages(&self) -> &[Message] {
        match self {
            ConversationState::Initial => &[],
            ConversationState::Active { messages, .. } => messages,
            ConversationState::Error { last_messages, .. } => last_messages,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ConversationState::Active { pending: true, .. })
    }

    pub fn error_text(&self) -> Option<&str> {
        match self {
            ConversationState::Error { error_text, .. } => Some(error_text),
            _ => None,
        }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            ConversationState::Initial => "initial",
            ConversationState::Active { pending: true, .. } => "awaiting_response",
            ConversationState::Active { pending: false, .. } => "success",
            ConversationState::Error { .. } => "error",
        }
    }
}

/// Token identifying one submission; later submissions get larger ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(u64);

impl RequestId {
    #[cfg(test)]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Everything the transition function reads: the observable state plus the
/// request whose completion is still awaited
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub state: ConversationState,
    pub in_flight: Option<RequestId>,
}
