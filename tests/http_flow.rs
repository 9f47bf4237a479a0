use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
    response::Response,
};
use httpmock::{Method::POST, MockServer};
use meetprep::{
    api,
    composer::{SUMMARY_INSTRUCTIONS, SUMMARY_SYSTEM_PROMPT},
    config::Config,
    service::AssistantService,
};
use serde_json::{Value, json};
use tower::ServiceExt;

const BOUNDARY: &str = "flow-boundary";
const SUMMARY: &str = "### Summary\n- Budget approved\n### Follow-Up Questions\n1. Who owns the rollout?";

fn app_for(server: &MockServer) -> Router {
    let config = Config {
        openai_api_key: "sk-flow".into(),
        openai_base_url: server.base_url(),
        model: "gpt-4o".into(),
        server_port: None,
    };
    let service = AssistantService::from_config(&config).expect("service");
    api::create_router(Arc::new(service))
}

fn completion(text: &str) -> Value {
    json!({
        "id": "chatcmpl-flow",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }]
    })
}

fn upload(filename: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

fn chat(payload: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

async fn json_body(response: Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json body")
}

#[tokio::test]
async fn upload_stores_document_then_summarizes_with_file_search() {
    let server = MockServer::start_async().await;
    let store = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/files")
                .header("authorization", "Bearer sk-flow")
                .body_contains("assistants")
                .body_contains("notes.pdf");
            then.status(200).json_body(json!({ "id": "h1", "object": "file" }));
        })
        .await;
    let generation = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions").json_body(json!({
                "model": "gpt-4o",
                "messages": [
                    { "role": "system", "content": SUMMARY_SYSTEM_PROMPT },
                    { "role": "user", "content": SUMMARY_INSTRUCTIONS }
                ],
                "tools": [{ "type": "file_search" }],
                "tool_choice": "auto",
                "file_ids": ["h1"]
            }));
            then.status(200).json_body(completion(SUMMARY));
        })
        .await;

    let response = app_for(&server)
        .oneshot(upload("notes.pdf", b"%PDF-1.4 quarterly review"))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "summary_and_followup": SUMMARY, "file_id": "h1" })
    );
    store.assert_async().await;
    generation.assert_async().await;
}

#[tokio::test]
async fn upload_of_unsupported_format_never_reaches_the_service() {
    let server = MockServer::start_async().await;
    let store = server
        .mock_async(|when, then| {
            when.method(POST).path("/files");
            then.status(200).json_body(json!({ "id": "h1" }));
        })
        .await;

    let response = app_for(&server)
        .oneshot(upload("notes.txt", b"plain"))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let detail = json_body(response).await["detail"]
        .as_str()
        .expect("detail")
        .to_string();
    assert!(detail.contains("PDF and DOCX"));
    store.assert_hits_async(0).await;
}

#[tokio::test]
async fn upload_store_failure_is_reported_with_upstream_detail() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/files");
            then.status(503).body("store maintenance");
        })
        .await;
    let generation = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(completion(SUMMARY));
        })
        .await;

    let response = app_for(&server)
        .oneshot(upload("notes.pdf", b"%PDF"))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let detail = json_body(response).await["detail"]
        .as_str()
        .expect("detail")
        .to_string();
    assert!(detail.starts_with("upload failed"));
    assert!(detail.contains("store maintenance"));
    generation.assert_hits_async(0).await;
}

#[tokio::test]
async fn upload_generation_failure_is_reported_with_upstream_detail() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/files");
            then.status(200).json_body(json!({ "id": "h1" }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(401).body("invalid api key");
        })
        .await;

    let response = app_for(&server)
        .oneshot(upload("notes.pdf", b"%PDF"))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let detail = json_body(response).await["detail"]
        .as_str()
        .expect("detail")
        .to_string();
    assert!(detail.starts_with("generation failed"));
    assert!(detail.contains("invalid api key"));
}

#[tokio::test]
async fn chat_without_file_id_sends_plain_completion() {
    let server = MockServer::start_async().await;
    let generation = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions").json_body(json!({
                "model": "gpt-4o",
                "messages": [{ "role": "user", "content": "hi" }]
            }));
            then.status(200).json_body(completion("hello"));
        })
        .await;

    let response = app_for(&server)
        .oneshot(chat(json!({ "messages": [{ "role": "user", "content": "hi" }] })))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "response": "hello" }));
    generation.assert_async().await;
}

#[tokio::test]
async fn chat_with_file_id_declares_file_search_on_that_handle() {
    let server = MockServer::start_async().await;
    let generation = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions").json_body(json!({
                "model": "gpt-4o",
                "messages": [
                    { "role": "user", "content": "hi" },
                    { "role": "assistant", "content": "hello" },
                    { "role": "user", "content": "what was decided?" }
                ],
                "tools": [{ "type": "file_search" }],
                "tool_choice": "auto",
                "file_ids": ["h1"]
            }));
            then.status(200).json_body(completion("The budget was approved."));
        })
        .await;

    let response = app_for(&server)
        .oneshot(chat(json!({
            "messages": [
                { "role": "user", "content": "hi" },
                { "role": "assistant", "content": "hello" },
                { "role": "user", "content": "what was decided?" }
            ],
            "file_id": "h1"
        })))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "response": "The budget was approved." })
    );
    generation.assert_async().await;
}

#[tokio::test]
async fn chat_generation_failure_is_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(500).body("upstream exploded");
        })
        .await;

    let response = app_for(&server)
        .oneshot(chat(json!({ "messages": [{ "role": "user", "content": "hi" }] })))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let detail = json_body(response).await["detail"]
        .as_str()
        .expect("detail")
        .to_string();
    assert!(detail.starts_with("generation failed"));
    assert!(detail.contains("upstream exploded"));
}
