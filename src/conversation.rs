//! Request-scoped data model shared by the composer, gateway, and HTTP surface.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instruction message fixing the assistant persona. Never accepted from callers.
    #[serde(skip_deserializing)]
    System,
    /// Message written by the end user.
    User,
    /// Message previously produced by the assistant.
    Assistant,
}

/// Single conversation turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the turn.
    pub role: Role,
    /// Plain-text body of the turn.
    pub content: String,
}

impl Message {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Build an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered sequence of messages, resubmitted in full by the caller on every turn.
pub type Conversation = Vec<Message>;

/// Opaque identifier issued by the external object store for an ingested document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentHandle(String);

impl DocumentHandle {
    /// Wrap a store-issued identifier. An empty identifier yields `None`.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of the upload path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadResult {
    /// Generated `### Summary` / `### Follow-Up Questions` text.
    pub summary_and_followup: String,
    /// Handle the caller resubmits on later chat turns.
    pub file_id: DocumentHandle,
}
