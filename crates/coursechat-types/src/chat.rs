//! Conversation message types for coursechat.
//!
//! A conversation is an ordered list of [`Message`] records owned by the
//! session controller. Messages are immutable once created; the transient
//! loading placeholder is removed by id rather than edited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// What a message represents on the conversation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// A real user submission or backend answer.
    #[default]
    Standard,
    /// Placeholder shown while a query is in flight.
    Loading,
    /// Greeting appended when a conversation starts.
    Welcome,
}

/// A single entry in the conversation.
///
/// `source_links`, when present, runs parallel to `sources`; entry `i` is the
/// link for `sources[i]` and may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Time-ordered identifier (UUID v7).
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_links: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
}

impl Message {
    fn build(role: MessageRole, content: String, kind: MessageKind) -> Self {
        Self {
            id: Uuid::now_v7(),
            role,
            content,
            sources: None,
            source_links: None,
            kind,
            created_at: Utc::now(),
        }
    }

    /// A message typed by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self::build(MessageRole::User, content.into(), MessageKind::Standard)
    }

    /// An assistant answer, optionally carrying citations.
    pub fn assistant(
        content: impl Into<String>,
        sources: Option<Vec<String>>,
        source_links: Option<Vec<Option<String>>>,
    ) -> Self {
        let mut message = Self::build(MessageRole::Assistant, content.into(), MessageKind::Standard);
        message.sources = sources;
        message.source_links = source_links;
        message
    }

    /// The placeholder displayed while waiting for an answer.
    pub fn loading() -> Self {
        Self::build(MessageRole::Assistant, String::new(), MessageKind::Loading)
    }

    /// The greeting that opens every conversation.
    pub fn welcome(content: impl Into<String>) -> Self {
        Self::build(MessageRole::Assistant, content.into(), MessageKind::Welcome)
    }

    pub fn is_loading(&self) -> bool {
        self.kind == MessageKind::Loading
    }
}
