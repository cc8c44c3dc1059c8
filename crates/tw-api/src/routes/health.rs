//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};
use tw_knowledge::SimilaritySearch;

use crate::state::AppState;

/// GET /health — liveness plus knowledge base readiness.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "knowledge_ready": state.knowledge.is_ready().await,
    }))
}
