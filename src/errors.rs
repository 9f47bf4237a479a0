//! Normalizes request failures into client-visible status/message pairs.

use crate::gateway::{GenerationError, IngestionError};
use crate::ingest::ValidationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Prefix wrapped around upstream object-store failures.
pub const UPLOAD_FAILED_PREFIX: &str = "upload failed";
/// Prefix wrapped around upstream generation failures.
pub const GENERATION_FAILED_PREFIX: &str = "generation failed";

/// Every failure a request can end with. Each one is terminal for that request.
#[derive(Debug, Error)]
pub enum AppError {
    /// Caller sent an unusable upload.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Object store rejected or never received the document.
    #[error(transparent)]
    Ingestion(#[from] IngestionError),
    /// Generation service failed to produce text.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Status and message returned to the caller as `{"detail": message}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserFacingError {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Human-readable detail.
    pub message: String,
}

impl From<&AppError> for UserFacingError {
    fn from(error: &AppError) -> Self {
        match error {
            AppError::Validation(inner) => Self {
                status: StatusCode::BAD_REQUEST,
                message: inner.to_string(),
            },
            AppError::Ingestion(inner) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("{UPLOAD_FAILED_PREFIX}: {inner}"),
            },
            AppError::Generation(inner) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("{GENERATION_FAILED_PREFIX}: {inner}"),
            },
        }
    }
}

impl AppError {
    /// Map to the caller-visible status and message.
    pub fn user_facing(&self) -> UserFacingError {
        UserFacingError::from(self)
    }
}

impl IntoResponse for UserFacingError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.message }))).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mapped = self.user_facing();
        if mapped.status.is_server_error() {
            tracing::error!(status = %mapped.status, detail = %mapped.message, "Request failed");
        } else {
            tracing::warn!(status = %mapped.status, detail = %mapped.message, "Request rejected");
        }
        mapped.into_response()
    }
}
