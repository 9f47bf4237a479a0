//! HTTP client for the OpenAI-compatible files and chat-completions endpoints.

use crate::config::Config;
use crate::conversation::{DocumentHandle, Message};
use crate::gateway::types::{
    FileUpload, GenerationError, GenerationRequest, GenerationResult, IngestionError,
};
use crate::gateway::{FileStore, GenerationGateway};
use async_trait::async_trait;
use reqwest::{
    Client, Response,
    multipart::{Form, Part},
};
use serde::{Deserialize, Serialize};

const FILE_SEARCH_TOOL: &str = "file_search";

/// Lightweight HTTP client shared by the document ingestor and the generation gateway.
pub struct OpenAiClient {
    pub(crate) http: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
}

impl OpenAiClient {
    /// Construct a client from the process-wide configuration.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder().user_agent("meetprep/0.1").build()?;
        let base_url = config.openai_base_url.trim_end_matches('/').to_string();
        tracing::debug!(
            url = %base_url,
            has_api_key = !config.openai_api_key.is_empty(),
            "Initialized generation service client"
        );
        Ok(Self {
            http,
            base_url,
            api_key: config.openai_api_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[derive(Serialize)]
struct ToolDeclaration {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Wire shape of a chat-completion call. Tool fields are omitted entirely when no document is
/// attached.
#[derive(Serialize)]
struct ChatCompletionPayload<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<[ToolDeclaration; 1]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_ids: Option<[&'a str; 1]>,
}

impl<'a> From<&'a GenerationRequest> for ChatCompletionPayload<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        let document = request.document();
        Self {
            model: request.model(),
            messages: request.messages(),
            tools: document.map(|_| {
                [ToolDeclaration {
                    kind: FILE_SEARCH_TOOL,
                }]
            }),
            tool_choice: document.map(|_| "auto"),
            file_ids: document.map(|handle| [handle.as_str()]),
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct FileObject {
    id: String,
}

async fn error_body(response: Response) -> String {
    response.text().await.unwrap_or_default()
}

#[async_trait]
impl GenerationGateway for OpenAiClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        let payload = ChatCompletionPayload::from(request);
        let response = self
            .http
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| GenerationError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(GenerationError::Rejected { status, body });
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|error| {
            GenerationError::InvalidResponse(format!("failed to decode completion: {error}"))
        })?;

        let text = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::InvalidResponse("no choices returned".into()))?
            .message
            .content
            .ok_or_else(|| GenerationError::InvalidResponse("choice has no content".into()))?;

        tracing::debug!(
            model = request.model(),
            tools_enabled = request.tools_enabled(),
            chars = text.len(),
            "Generation completed"
        );
        Ok(GenerationResult { text })
    }
}

#[async_trait]
impl FileStore for OpenAiClient {
    async fn upload_file(&self, upload: FileUpload) -> Result<DocumentHandle, IngestionError> {
        let FileUpload {
            filename,
            media_type,
            bytes,
            purpose,
        } = upload;
        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(filename.clone())
            .mime_str(media_type)
            .map_err(|error| IngestionError::Transport(error.to_string()))?;
        let form = Form::new().text("purpose", purpose).part("file", part);

        let response = self
            .http
            .post(self.endpoint("files"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|error| IngestionError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(IngestionError::Rejected { status, body });
        }

        let file: FileObject = response.json().await.map_err(|error| {
            IngestionError::InvalidResponse(format!("failed to decode file object: {error}"))
        })?;
        let handle = DocumentHandle::new(file.id)
            .ok_or_else(|| IngestionError::InvalidResponse("store returned an empty id".into()))?;

        tracing::debug!(filename = %filename, size, file_id = %handle, "Document stored");
        Ok(handle)
    }
}
