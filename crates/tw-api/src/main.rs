//! Tablewise API — restaurant bookings and chat assistant REST server.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use tw_api::config::ApiConfig;
use tw_api::db;
use tw_api::llm::create_completion;
use tw_api::routes::build_router;
use tw_api::state::AppState;
use tw_api::store::MemoryStore;
use tw_knowledge::{KnowledgeBase, TextSplitter, create_embedder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "tw-api starting");

    let config = ApiConfig::load()?;

    let completion = create_completion(&config.llm)?;
    let embedder = create_embedder(&config.knowledge.embedding)?;
    let knowledge = Arc::new(KnowledgeBase::new(
        embedder,
        TextSplitter::new(config.knowledge.chunk_size, config.knowledge.chunk_overlap),
    ));

    // Connect to PostgreSQL if DATABASE_URL is set, otherwise keep bookings in memory.
    let state = if let Some(database_url) = &config.database_url {
        tracing::info!("connecting to PostgreSQL");
        let pool = db::connect(database_url).await?;
        AppState::with_pool(pool, &config, completion, knowledge)
    } else {
        tracing::warn!("DATABASE_URL not set, bookings are kept in memory");
        AppState::build(&config, Arc::new(MemoryStore::new()), completion, knowledge)
    };

    if config.knowledge.init_on_startup {
        match state.knowledge.initialize_from_dir(&config.knowledge.path).await {
            Ok(chunks) => tracing::info!(
                path = %config.knowledge.path.display(),
                chunks,
                "knowledge base initialized"
            ),
            Err(e) => tracing::warn!(
                path = %config.knowledge.path.display(),
                error = %e,
                "knowledge base not initialized, inquiries answer 'not ready' until it is"
            ),
        }
    }

    tracing::info!(
        max_capacity = config.max_capacity,
        llm_model = %config.llm.model,
        embedding = %config.knowledge.embedding.provider,
        "configuration loaded"
    );

    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
