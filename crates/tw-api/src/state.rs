//! Shared application state for the Axum server.
//!
//! Supports two storage modes:
//! - **Database mode**: bookings in PostgreSQL via `PgStore` (production).
//! - **In-memory mode**: bookings in `MemoryStore` (tests and development).
//!
//! Everything else (capacity oracle, chat pipelines, sessions, knowledge
//! base) is owned here and injected into handlers; there are no globals.

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::PgPool;
use tw_knowledge::{HashingEmbedder, KnowledgeBase, TextSplitter};

use crate::capacity::CapacityOracle;
use crate::config::ApiConfig;
use crate::llm::{DisabledCompletion, TextCompletion};
use crate::pipeline::{ChatAssistant, InquiryPipeline, ReservationPipeline};
use crate::sessions::SessionStore;
use crate::store::{MemoryStore, PgStore, ReservationStore};

/// Shared application state, cheap to clone into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Booking table (PostgreSQL or in-memory).
    pub store: Arc<dyn ReservationStore>,
    /// Admission control over `store`.
    pub oracle: Arc<CapacityOracle>,
    /// Routed reservation + inquiry pipelines.
    pub assistant: Arc<ChatAssistant>,
    pub sessions: Arc<SessionStore>,
    pub knowledge: Arc<KnowledgeBase>,
    /// Directory `POST /api/initialize-knowledge-base/` reads from.
    pub knowledge_dir: PathBuf,
    /// Allowed CORS origins; empty or `*` allows any.
    pub cors_origins: Vec<String>,
}

impl AppState {
    /// Wire every component from its collaborators.
    pub fn build(
        config: &ApiConfig,
        store: Arc<dyn ReservationStore>,
        completion: Arc<dyn TextCompletion>,
        knowledge: Arc<KnowledgeBase>,
    ) -> Self {
        let oracle = Arc::new(CapacityOracle::new(store.clone(), config.max_capacity));
        let assistant = ChatAssistant::new(
            ReservationPipeline::new(oracle.clone(), completion.clone()),
            InquiryPipeline::new(knowledge.clone(), completion, config.knowledge.top_k),
        );
        tracing::debug!(
            store = store.backend_name(),
            max_capacity = config.max_capacity,
            "application state built"
        );
        Self {
            store,
            oracle,
            assistant: Arc::new(assistant),
            sessions: Arc::new(SessionStore::new(config.session_ttl())),
            knowledge,
            knowledge_dir: config.knowledge.path.clone(),
            cors_origins: config.cors_origins.clone(),
        }
    }

    /// Create state backed by a PostgreSQL pool.
    pub fn with_pool(
        pool: PgPool,
        config: &ApiConfig,
        completion: Arc<dyn TextCompletion>,
        knowledge: Arc<KnowledgeBase>,
    ) -> Self {
        Self::build(config, Arc::new(PgStore::new(pool)), completion, knowledge)
    }

    /// Create in-memory state with generation disabled (for tests).
    pub fn new() -> Self {
        Self::in_memory(&ApiConfig::default(), Arc::new(DisabledCompletion))
    }

    /// In-memory bookings and a hashing-embedder knowledge base.
    pub fn in_memory(config: &ApiConfig, completion: Arc<dyn TextCompletion>) -> Self {
        Self::build(
            config,
            Arc::new(MemoryStore::new()),
            completion,
            Arc::new(local_knowledge_base(config)),
        )
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Knowledge base with the deterministic hashing embedder.
pub fn local_knowledge_base(config: &ApiConfig) -> KnowledgeBase {
    KnowledgeBase::new(
        Arc::new(HashingEmbedder::new(config.knowledge.embedding.dims)),
        TextSplitter::new(config.knowledge.chunk_size, config.knowledge.chunk_overlap),
    )
}
