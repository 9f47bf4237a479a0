//! Request, result, and error types exchanged with the external generation service.

use crate::conversation::{Conversation, DocumentHandle, Message};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while generating text through the external service.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// HTTP layer failed before a response arrived (connect, TLS, timeout).
    #[error("request to generation service failed: {0}")]
    Transport(String),
    /// Service answered with a non-success status (auth, quota, bad request).
    #[error("generation service returned {status}: {body}")]
    Rejected {
        /// HTTP status returned upstream.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Response arrived but did not carry generated text.
    #[error("malformed generation response: {0}")]
    InvalidResponse(String),
}

/// Errors raised while pushing a document into the external object store.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Refused locally: the store never accepts an empty document.
    #[error("document is empty")]
    EmptyPayload,
    /// HTTP layer failed before a response arrived.
    #[error("request to object store failed: {0}")]
    Transport(String),
    /// Store answered with a non-success status.
    #[error("object store returned {status}: {body}")]
    Rejected {
        /// HTTP status returned upstream.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Store answered without a usable handle.
    #[error("malformed object store response: {0}")]
    InvalidResponse(String),
}

/// Fully shaped generation call.
///
/// Retrieval augmentation and the document reference travel together: the only way to enable
/// tools is to attach a handle, so `tools_enabled()` can never disagree with `document()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    model: String,
    messages: Conversation,
    document: Option<DocumentHandle>,
}

impl GenerationRequest {
    /// Plain generation request without retrieval augmentation.
    pub fn new(model: impl Into<String>, messages: Conversation) -> Self {
        Self {
            model: model.into(),
            messages,
            document: None,
        }
    }

    /// Enable retrieval augmentation against the given document.
    pub fn with_document(mut self, handle: DocumentHandle) -> Self {
        self.document = Some(handle);
        self
    }

    /// Model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Messages in caller order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Document searched by the retrieval tool, when enabled.
    pub fn document(&self) -> Option<&DocumentHandle> {
        self.document.as_ref()
    }

    /// Whether the retrieval tool is declared on this call.
    pub fn tools_enabled(&self) -> bool {
        self.document.is_some()
    }
}

/// Generated content returned unchanged by the gateway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Generated text.
    pub text: String,
}

/// Document payload forwarded verbatim to the object store.
#[derive(Clone, Debug)]
pub struct FileUpload {
    /// Original client filename, forwarded for the store's bookkeeping.
    pub filename: String,
    /// MIME type matching the declared document format.
    pub media_type: &'static str,
    /// Raw document bytes.
    pub bytes: Vec<u8>,
    /// Store-side purpose tag.
    pub purpose: &'static str,
}
