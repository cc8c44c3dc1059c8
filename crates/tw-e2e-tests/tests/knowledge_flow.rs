//! E2E tests for knowledge base initialization and upload feeding retrieval.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::MockServer;

use helpers::{TestHarness, mock_completion, received_prompts};
use tw_api::config::ApiConfig;
use tw_api::llm::{LlmConfig, OpenAiCompatClient};

fn harness_for_dir(dir: &std::path::Path, server: &MockServer) -> TestHarness {
    let mut config = ApiConfig::default();
    config.knowledge.path = dir.to_path_buf();
    config.knowledge.top_k = 1;
    let client = OpenAiCompatClient::new(LlmConfig {
        base_url: server.uri(),
        api_key: Some("gsk-test".into()),
        timeout_secs: 2,
        ..LlmConfig::default()
    })
    .unwrap();
    TestHarness::from_config(&config, std::sync::Arc::new(client))
}

/// Initialize from a directory of text files, then answer with the most
/// relevant passage as context.
#[tokio::test]
async fn e2e_initialize_then_answer() {
    let dir = tempfile::tempdir().unwrap();
    for (name, text) in helpers::SAMPLE_DOCS {
        std::fs::write(dir.path().join(name), text).unwrap();
    }
    std::fs::write(dir.path().join("draft.md"), "not indexed").unwrap();

    let server = MockServer::start().await;
    mock_completion(&server, "Yes, there is free parking behind the building.").await;
    let h = harness_for_dir(dir.path(), &server);

    let (status, health) = h.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["knowledge_ready"], false);

    let (status, json) = h.post("/api/initialize-knowledge-base/", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert_eq!(json["chunks"], 3);

    let (_, health) = h.get("/health").await;
    assert_eq!(health["knowledge_ready"], true);

    let (reply, _) = h.chat("Is there parking nearby?", None).await;
    assert_eq!(reply, "<p>Yes, there is free parking behind the building.</p>");

    let prompts = received_prompts(&server).await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("free parking is available"), "got {}", prompts[0]);
    assert!(!prompts[0].contains("butter chicken"));
}

/// Re-initializing replaces the index instead of appending to it.
#[tokio::test]
async fn e2e_reinitialize_replaces_index() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("hours.txt"), helpers::SAMPLE_DOCS[0].1).unwrap();
    let server = MockServer::start().await;
    let h = harness_for_dir(dir.path(), &server);

    let (_, json) = h.post("/api/initialize-knowledge-base/", serde_json::json!({})).await;
    assert_eq!(json["chunks"], 1);
    let (_, json) = h.post("/api/initialize-knowledge-base/", serde_json::json!({})).await;
    assert_eq!(json["chunks"], 1);
    assert_eq!(h.state.knowledge.chunk_count().await, 1);
}

/// An empty directory is a server-side error and leaves the index unready.
#[tokio::test]
async fn e2e_initialize_from_empty_dir_fails() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    let h = harness_for_dir(dir.path(), &server);

    let (status, json) = h.post("/api/initialize-knowledge-base/", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["status"], 500);

    let (_, health) = h.get("/health").await;
    assert_eq!(health["knowledge_ready"], false);
}

/// A `.pdf` upload whose bytes are not a PDF is a client error.
#[tokio::test]
async fn e2e_upload_corrupt_pdf_is_bad_request() {
    let h = TestHarness::new();
    let boundary = "TWBOUNDARY";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"menu.pdf\"\r\n\
         Content-Type: application/pdf\r\n\r\nthis is not a pdf\r\n--{boundary}--\r\n"
    );
    let response = h
        .router
        .clone()
        .oneshot(
            Request::post("/api/upload-pdf/")
                .header("content-type", format!("multipart/form-data; boundary={boundary}"))
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(json["error"].is_string());
    assert_eq!(h.state.knowledge.chunk_count().await, 0);
}
