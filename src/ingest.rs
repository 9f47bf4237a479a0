//! Document ingestion: format allow-list and forwarding to the external object store.

use crate::conversation::DocumentHandle;
use crate::gateway::{FileStore, FileUpload, IngestionError};
use std::sync::Arc;
use thiserror::Error;

/// Purpose tag attached to every stored document so the retrieval tool can search it.
pub const STORE_PURPOSE: &str = "assistants";

/// Human-readable list of accepted formats, quoted in validation errors.
pub const SUPPORTED_FORMATS: &str = "PDF and DOCX";

/// Caller-correctable request problems.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Filename does not end in an accepted extension.
    #[error("Only PDF and DOCX files are supported")]
    UnsupportedFormat {
        /// Name supplied by the client.
        filename: String,
    },
    /// Multipart body carried no `file` field.
    #[error("No file provided; only PDF and DOCX files are supported")]
    MissingFile,
    /// Uploaded file had zero bytes.
    #[error("Uploaded file is empty; only non-empty PDF and DOCX files are supported")]
    EmptyFile,
    /// Multipart body could not be read.
    #[error("Malformed upload body: {0}")]
    MalformedBody(String),
    /// Chat body was not valid JSON or did not match the message schema.
    #[error("Invalid chat request: {0}")]
    InvalidChatBody(String),
}

/// Document formats accepted for upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Portable Document Format (`.pdf`).
    Pdf,
    /// Office Open XML word-processing document (`.docx`).
    Docx,
}

impl DocumentFormat {
    /// Resolve the format from the filename suffix.
    ///
    /// Matching is case-sensitive on the suffix, so `report.PDF` is rejected just like
    /// `notes.txt`.
    pub fn from_filename(filename: &str) -> Result<Self, ValidationError> {
        if filename.ends_with(".pdf") {
            Ok(Self::Pdf)
        } else if filename.ends_with(".docx") {
            Ok(Self::Docx)
        } else {
            Err(ValidationError::UnsupportedFormat {
                filename: filename.to_string(),
            })
        }
    }

    /// MIME type sent along with the document bytes.
    pub fn media_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// Forwards uploaded documents to the object store and returns the issued handle.
pub struct DocumentIngestor<S> {
    store: Arc<S>,
}

impl<S> DocumentIngestor<S>
where
    S: FileStore,
{
    /// Wrap a shared store client.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Store the document once; any failure ends the operation without retry.
    pub async fn ingest(
        &self,
        filename: &str,
        format: DocumentFormat,
        bytes: Vec<u8>,
    ) -> Result<DocumentHandle, IngestionError> {
        if bytes.is_empty() {
            return Err(IngestionError::EmptyPayload);
        }
        tracing::info!(filename, ?format, size = bytes.len(), "Ingesting document");
        self.store
            .upload_file(FileUpload {
                filename: filename.to_string(),
                media_type: format.media_type(),
                bytes,
                purpose: STORE_PURPOSE,
            })
            .await
    }
}
