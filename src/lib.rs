#![deny(missing_docs)]

//! Core library for the Meetprep document summarization and chat server.

/// HTTP routing and REST handlers.
pub mod api;
/// Request builders for summarization and chat.
pub mod composer;
/// Environment-driven configuration management.
pub mod config;
/// Messages, conversations, and document handles.
pub mod conversation;
/// Mapping of failures to client-visible responses.
pub mod errors;
/// External generation service adapters.
pub mod gateway;
/// Document format checks and object-store ingestion.
pub mod ingest;
/// Structured logging and tracing setup.
pub mod logging;
/// Upload and chat orchestration.
pub mod service;
