//! Orchestrates the upload and chat flows across the ingestor, composer, and gateway.

use crate::{
    composer::Composer,
    config::Config,
    conversation::{Conversation, DocumentHandle, UploadResult},
    errors::AppError,
    gateway::{FileStore, GenerationGateway, OpenAiClient},
    ingest::{DocumentFormat, DocumentIngestor},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Abstraction over the orchestration layer used by the HTTP surface.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Store a validated document, then generate its summary and follow-up questions.
    async fn upload(
        &self,
        filename: String,
        format: DocumentFormat,
        bytes: Vec<u8>,
    ) -> Result<UploadResult, AppError>;

    /// Answer the latest turn of `conversation`, searching the document when a handle is given.
    async fn chat(
        &self,
        conversation: Conversation,
        handle: Option<DocumentHandle>,
    ) -> Result<String, AppError>;

    /// Model identifier used for generation.
    fn model(&self) -> &str;
}

/// Request-scoped orchestration over shared, immutable clients.
///
/// Holds no per-document or per-conversation state, so concurrent requests never contend.
pub struct AssistantService<S, G> {
    ingestor: DocumentIngestor<S>,
    gateway: Arc<G>,
    composer: Composer,
}

impl AssistantService<OpenAiClient, OpenAiClient> {
    /// Build the service against the configured external generation service.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Arc::new(OpenAiClient::new(config)?);
        Ok(Self::new(
            Composer::new(config.model.clone()),
            client.clone(),
            client,
        ))
    }
}

impl<S, G> AssistantService<S, G>
where
    S: FileStore,
    G: GenerationGateway,
{
    /// Assemble the service from explicit collaborators.
    pub fn new(composer: Composer, store: Arc<S>, gateway: Arc<G>) -> Self {
        Self {
            ingestor: DocumentIngestor::new(store),
            gateway,
            composer,
        }
    }
}

#[async_trait]
impl<S, G> AssistantApi for AssistantService<S, G>
where
    S: FileStore + 'static,
    G: GenerationGateway + 'static,
{
    async fn upload(
        &self,
        filename: String,
        format: DocumentFormat,
        bytes: Vec<u8>,
    ) -> Result<UploadResult, AppError> {
        let handle = self.ingestor.ingest(&filename, format, bytes).await?;
        tracing::info!(filename = %filename, file_id = %handle, "Document ingested");

        let request = self.composer.compose_summarization(handle.clone());
        let result = self.gateway.generate(&request).await?;
        Ok(UploadResult {
            summary_and_followup: result.text,
            file_id: handle,
        })
    }

    async fn chat(
        &self,
        conversation: Conversation,
        handle: Option<DocumentHandle>,
    ) -> Result<String, AppError> {
        let turns = conversation.len();
        let request = self.composer.compose_chat(conversation, handle);
        tracing::debug!(
            turns,
            tools_enabled = request.tools_enabled(),
            "Composed chat request"
        );
        let result = self.gateway.generate(&request).await?;
        Ok(result.text)
    }

    fn model(&self) -> &str {
        self.composer.model()
    }
}
