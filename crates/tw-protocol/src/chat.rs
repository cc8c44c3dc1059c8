use serde::{Deserialize, Serialize};

/// Default party size when a chat message names none.
pub const DEFAULT_PARTY_SIZE: u32 = 2;

/// Default time when a chat message names none.
pub const DEFAULT_TIME: &str = "7:00 PM";

/// Reservation fields pulled out of a free-text chat message.
///
/// Each field is either parsed from the text or a fallback default; which
/// one is not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationIntent {
    pub date: String,
    pub time: String,
    pub guests: u32,
}

/// Domain relevance of a free-text inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopicScore {
    /// Heuristic confidence in `[0, 1]`.
    pub confidence: f64,
    pub is_relevant: bool,
}

/// Request body for `POST /api/chat/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response body for `POST /api/chat/`. `response` is rendered HTML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
}
