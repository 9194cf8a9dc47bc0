//! Conversation message types.
//!
//! A conversation is an append-only sequence of [`Message`] values. Messages
//! are created once and never mutated; insertion order is display order.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::ItemRef;

/// Unique identifier for a message (UUID v7, time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Assistant,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Author::User => write!(f, "user"),
            Author::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for Author {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Author::User),
            "assistant" => Ok(Author::Assistant),
            other => Err(format!("invalid author: '{other}'")),
        }
    }
}

/// A single entry in the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub author: Author,
    /// Recommended items attached to an assistant reply. Always empty for
    /// user messages and for error replies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommended_items: Vec<ItemRef>,
    /// True when this assistant message reports a failed query.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a user-authored message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            author: Author::User,
            recommended_items: Vec::new(),
            is_error: false,
            created_at: Utc::now(),
        }
    }

    /// Create an assistant reply carrying recommendations.
    pub fn assistant(text: impl Into<String>, recommended_items: Vec<ItemRef>) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            author: Author::Assistant,
            recommended_items,
            is_error: false,
            created_at: Utc::now(),
        }
    }

    /// Create an assistant message reporting that a query failed.
    pub fn assistant_error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::assistant(text, Vec::new())
        }
    }

    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }

    pub fn is_assistant(&self) -> bool {
        self.author == Author::Assistant
    }
}
