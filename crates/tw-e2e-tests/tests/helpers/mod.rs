//! Shared test harness for E2E integration tests.
//!
//! Builds the full Axum router over in-memory bookings and a
//! hashing-embedder knowledge base, with the generative layer either
//! disabled, pointed at a wiremock server, or replaced by a fake.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tw_api::config::ApiConfig;
use tw_api::llm::{DisabledCompletion, LlmConfig, OpenAiCompatClient, TextCompletion};
use tw_api::routes::build_router;
use tw_api::state::AppState;
use tw_api::store::ReservationStore;
use tw_knowledge::SourceDocument;
use tw_protocol::reservation::NewReservation;

/// Restaurant facts indexed by [`TestHarness::with_sample_knowledge`].
pub const SAMPLE_DOCS: &[(&str, &str)] = &[
    (
        "hours.txt",
        "Opening hours: we are open Tuesday to Sunday from 5 PM to 11 PM. We are closed on Mondays.",
    ),
    (
        "menu.txt",
        "Menu highlights: butter chicken, lamb biryani, paneer tikka and a vegan thali. \
         Desserts include gulab jamun and mango kulfi.",
    ),
    (
        "parking.txt",
        "Parking: free parking is available in the lot behind the building.",
    ),
];

/// End-to-end harness around the real router.
pub struct TestHarness {
    pub state: AppState,
    pub router: Router,
}

impl TestHarness {
    /// In-memory state, generation disabled.
    pub fn new() -> Self {
        Self::with_completion(Arc::new(DisabledCompletion))
    }

    pub fn with_completion(completion: Arc<dyn TextCompletion>) -> Self {
        Self::from_config(&ApiConfig::default(), completion)
    }

    pub fn from_config(config: &ApiConfig, completion: Arc<dyn TextCompletion>) -> Self {
        let state = AppState::in_memory(config, completion);
        let router = build_router(state.clone());
        Self { state, router }
    }

    /// Generation through the OpenAI-compatible client against `server`.
    pub fn with_llm_server(server: &MockServer) -> Self {
        let client = OpenAiCompatClient::new(LlmConfig {
            base_url: server.uri(),
            model: "llama3-8b-8192".into(),
            api_key: Some("gsk-test".into()),
            timeout_secs: 2,
        })
        .unwrap();
        Self::with_completion(Arc::new(client))
    }

    /// Index [`SAMPLE_DOCS`] into the knowledge base.
    pub async fn with_sample_knowledge(self) -> Self {
        let docs = SAMPLE_DOCS
            .iter()
            .map(|(source, text)| SourceDocument::new(*source, *text))
            .collect();
        self.state.knowledge.rebuild(docs).await.unwrap();
        self
    }

    /// Put existing guests into a slot directly through the store.
    pub async fn seed(&self, date: &str, time: &str, guests: u32) {
        self.state
            .store
            .append(NewReservation::from_chat(date, time, guests))
            .await
            .unwrap();
    }

    pub async fn occupancy(&self, date: &str, time: &str) -> i64 {
        self.state.store.occupancy(date, time).await.unwrap()
    }

    pub async fn post(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    /// POST /api/chat/. Returns (rendered response, session id).
    pub async fn chat(&self, message: &str, session_id: Option<&str>) -> (String, String) {
        let mut body = serde_json::json!({ "message": message });
        if let Some(id) = session_id {
            body["session_id"] = id.into();
        }
        let (status, json) = self.post("/api/chat/", body).await;
        assert_eq!(status, StatusCode::OK, "chat failed: {json}");
        (
            json["response"].as_str().unwrap().to_string(),
            json["session_id"].as_str().unwrap().to_string(),
        )
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }
}

/// Chat-completions response body carrying `content`.
pub fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-e2e",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

/// Mount a `/chat/completions` mock answering `content`.
pub async fn mock_completion(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
        .mount(server)
        .await;
}

/// Mount a `/chat/completions` mock failing with `status`.
pub async fn mock_completion_failure(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(status).set_body_string("upstream error"))
        .mount(server)
        .await;
}

/// User message contents of every completion request `server` received.
pub async fn received_prompts(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| {
            let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
            body["messages"][1]["content"].as_str().unwrap_or_default().to_string()
        })
        .collect()
}
