//! HTTP surface for Meetprep.
//!
//! - `POST /upload` – Multipart body with a `file` field (`.pdf` or `.docx`). Stores the document
//!   with the external service and returns `{ "summary_and_followup", "file_id" }`.
//! - `POST /chat` – JSON `{ "messages": [...], "file_id"?: "..." }`. Returns `{ "response" }`.
//!   Document search is enabled exactly when a non-empty `file_id` is supplied.
//! - `GET /health` – Liveness probe reporting the configured model.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! Failures are returned as `{ "detail": "..." }` with `400` for unusable uploads or chat bodies
//! and `500` for upstream store or generation failures.

use crate::conversation::{Conversation, DocumentHandle};
use crate::errors::AppError;
use crate::ingest::{DocumentFormat, ValidationError};
use crate::service::AssistantApi;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, rejection::JsonRejection},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

const FILE_FIELD: &str = "file";

/// Build the HTTP router exposing the upload and chat surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: AssistantApi + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/upload", post(upload_document::<S>))
        .route("/chat", post(chat::<S>))
        .route("/health", get(health::<S>))
        .route("/commands", get(get_commands))
        // Size limits belong to the object store; axum's 2 MiB default would reject most decks.
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .with_state(service)
}

/// Success response for `POST /upload`.
#[derive(Serialize)]
struct UploadResponse {
    /// Generated summary followed by follow-up questions.
    summary_and_followup: String,
    /// Handle to resubmit with later chat turns.
    file_id: String,
}

/// Pull the `file` field out of the multipart body.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ValidationError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ValidationError::MalformedBody(err.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ValidationError::MalformedBody(err.to_string()))?;
        return Ok((filename, bytes.to_vec()));
    }
    Err(ValidationError::MissingFile)
}

/// Store an uploaded document and return its summary plus follow-up questions.
async fn upload_document<S>(
    State(service): State<Arc<S>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError>
where
    S: AssistantApi,
{
    let (filename, bytes) = read_file_field(&mut multipart).await?;
    let format = DocumentFormat::from_filename(&filename)?;
    if bytes.is_empty() {
        return Err(ValidationError::EmptyFile.into());
    }
    tracing::info!(filename = %filename, size = bytes.len(), "Upload received");

    let result = service.upload(filename, format, bytes).await?;
    tracing::info!(file_id = %result.file_id, "Upload request completed");
    Ok(Json(UploadResponse {
        summary_and_followup: result.summary_and_followup,
        file_id: result.file_id.to_string(),
    }))
}

/// Request body for `POST /chat`.
#[derive(Deserialize)]
struct ChatRequest {
    /// Full conversation so far, oldest first, ending with the current user turn.
    messages: Conversation,
    /// Handle returned by a previous upload.
    #[serde(default)]
    file_id: Option<String>,
}

/// Success response for `POST /chat`.
#[derive(Serialize)]
struct ChatResponse {
    response: String,
}

/// Answer the latest turn, searching the referenced document when a handle is supplied.
async fn chat<S>(
    State(service): State<Arc<S>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError>
where
    S: AssistantApi,
{
    let Json(ChatRequest { messages, file_id }) =
        payload.map_err(|rejection| ValidationError::InvalidChatBody(rejection.body_text()))?;
    let handle = file_id.and_then(DocumentHandle::new);
    tracing::info!(
        turns = messages.len(),
        file_id = handle.as_ref().map(DocumentHandle::as_str),
        "Chat request received"
    );
    let response = service.chat(messages, handle).await?;
    Ok(Json(ChatResponse { response }))
}

/// Response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    model: String,
}

async fn health<S>(State(service): State<Arc<S>>) -> Json<HealthResponse>
where
    S: AssistantApi,
{
    Json(HealthResponse {
        status: "ok",
        model: service.model().to_string(),
    })
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "upload",
                method: "POST",
                path: "/upload",
                description: "Upload a PDF or DOCX as multipart field `file`. Response returns { \"summary_and_followup\": string, \"file_id\": string }.",
                request_example: None,
            },
            CommandDescriptor {
                name: "chat",
                method: "POST",
                path: "/chat",
                description: "Continue a conversation; pass `file_id` from /upload to ground answers in the document. Response returns { \"response\": string }.",
                request_example: Some(json!({
                    "messages": [
                        { "role": "user", "content": "What decisions are still open?" }
                    ],
                    "file_id": "file-abc123"
                })),
            },
            CommandDescriptor {
                name: "health",
                method: "GET",
                path: "/health",
                description: "Report liveness and the configured generation model.",
                request_example: None,
            },
        ],
    })
}
