//! Chat assistant endpoint.

use axum::Json;
use axum::extract::State;
use tw_protocol::chat::{ChatRequest, ChatResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// POST /api/chat/ — route a message to the reservation or inquiry
/// pipeline and answer with rendered HTML.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".into()));
    }

    let session = state.sessions.open(req.session_id.as_deref()).await;
    let reply = state.assistant.respond(message, &session.history).await?;
    state.sessions.record(&session.id, message, &reply.text).await;

    tracing::debug!(session_id = %session.id, turns = session.history.len() + 1, "chat answered");
    Ok(Json(ChatResponse {
        response: reply.html,
        session_id: session.id,
    }))
}
