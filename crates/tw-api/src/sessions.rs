//! Chat sessions with idle expiry.
//!
//! Each session keeps the last [`MAX_TURNS`] exchanges. Expired sessions
//! are swept on every access; there is no background task.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use uuid::Uuid;

/// Exchanges retained per session.
pub const MAX_TURNS: usize = 10;

/// One user message and the reply it got (plain text, before rendering).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub user: String,
    pub assistant: String,
}

struct Session {
    turns: VecDeque<Turn>,
    last_seen: Instant,
}

impl Session {
    fn new(now: Instant) -> Self {
        Self {
            turns: VecDeque::new(),
            last_seen: now,
        }
    }
}

/// Session id plus the transcript known at the time it was opened.
#[derive(Debug, Clone)]
pub struct OpenSession {
    pub id: String,
    pub history: Vec<Turn>,
}

pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Resume `requested` if it is live, otherwise start a session under
    /// that id (or a fresh UUIDv4 when none was given).
    pub async fn open(&self, requested: Option<&str>) -> OpenSession {
        self.open_at(requested, Instant::now()).await
    }

    /// Append an exchange to a session, creating it if it expired meanwhile.
    pub async fn record(&self, id: &str, user: &str, assistant: &str) {
        self.record_at(id, user, assistant, Instant::now()).await
    }

    pub async fn active_count(&self) -> usize {
        let mut sessions = self.sessions.lock().await;
        self.sweep(&mut sessions, Instant::now());
        sessions.len()
    }

    async fn open_at(&self, requested: Option<&str>, now: Instant) -> OpenSession {
        let mut sessions = self.sessions.lock().await;
        self.sweep(&mut sessions, now);

        let id = match requested.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        let session = sessions.entry(id.clone()).or_insert_with(|| {
            tracing::debug!(session_id = %id, "chat session started");
            Session::new(now)
        });
        session.last_seen = now;

        OpenSession {
            id,
            history: session.turns.iter().cloned().collect(),
        }
    }

    async fn record_at(&self, id: &str, user: &str, assistant: &str, now: Instant) {
        let mut sessions = self.sessions.lock().await;
        self.sweep(&mut sessions, now);

        let session = sessions
            .entry(id.to_string())
            .or_insert_with(|| Session::new(now));
        session.turns.push_back(Turn {
            user: user.to_string(),
            assistant: assistant.to_string(),
        });
        while session.turns.len() > MAX_TURNS {
            session.turns.pop_front();
        }
        session.last_seen = now;
    }

    fn sweep(&self, sessions: &mut HashMap<String, Session>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, s| now.saturating_duration_since(s.last_seen) < self.ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::debug!(expired, remaining = sessions.len(), "expired chat sessions swept");
        }
    }
}
