//! Gateway to the external generation service: object-store uploads and chat completions.
//!
//! Both operations are single-attempt. Failures are classified into [`IngestionError`] or
//! [`GenerationError`] carrying the upstream detail and surface immediately to the caller.

use async_trait::async_trait;

pub mod client;
pub mod types;

pub use client::OpenAiClient;
pub use types::{FileUpload, GenerationError, GenerationRequest, GenerationResult, IngestionError};

use crate::conversation::DocumentHandle;

/// Remote text-generation capability.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Run one generation call and return the produced text untouched.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError>;
}

/// Remote object store that issues handles for uploaded documents.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store the document and return the handle assigned by the store.
    async fn upload_file(&self, upload: FileUpload) -> Result<DocumentHandle, IngestionError>;
}
