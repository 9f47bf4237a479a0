//! Builds generation requests for the upload and chat paths.
//!
//! Retrieval augmentation is gated on the presence of a document handle and nothing else: the
//! content of the conversation never influences whether the file-search tool is declared.
//! Composition is pure and synchronous; all I/O happens in the gateway.

use crate::conversation::{Conversation, DocumentHandle, Message};
use crate::gateway::GenerationRequest;

/// Persona fixed for the summarization call.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a meeting assistant AI.";

/// Heading that opens the summary section of the upload response.
pub const SUMMARY_HEADER: &str = "### Summary";

/// Heading that opens the follow-up questions section of the upload response.
pub const FOLLOW_UP_HEADER: &str = "### Follow-Up Questions";

/// Instruction sent as the user turn of the summarization call.
pub const SUMMARY_INSTRUCTIONS: &str = "\
You are an expert assistant helping a user prepare for meetings.
The uploaded document contains important context. Based on the file:
1. Summarize the key points as a bulleted list.
2. Generate 3–5 follow-up questions the user should ask in their next meeting.
Reply in the following format:
### Summary
- ...
### Follow-Up Questions
1. ...
2. ...
";

/// Stateless request builder bound to the process-wide model identifier.
#[derive(Clone, Debug)]
pub struct Composer {
    model: String,
}

impl Composer {
    /// Create a composer emitting requests for `model`.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    /// Model identifier stamped on every request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Fixed two-message summarization request; retrieval is always enabled on this path.
    pub fn compose_summarization(&self, handle: DocumentHandle) -> GenerationRequest {
        let messages = vec![
            Message::system(SUMMARY_SYSTEM_PROMPT),
            Message::user(SUMMARY_INSTRUCTIONS),
        ];
        GenerationRequest::new(self.model.clone(), messages).with_document(handle)
    }

    /// Chat request reusing the conversation verbatim, with retrieval iff a handle is supplied.
    pub fn compose_chat(
        &self,
        conversation: Conversation,
        handle: Option<DocumentHandle>,
    ) -> GenerationRequest {
        let request = GenerationRequest::new(self.model.clone(), conversation);
        match handle {
            Some(handle) => request.with_document(handle),
            None => request,
        }
    }
}
