//! In-memory vector index and the similarity search seam.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::chunk::TextSplitter;
use crate::embedding::{Embedder, cosine_similarity};
use crate::error::{KnowledgeError, KnowledgeResult};
use crate::loader::{SourceDocument, load_text_dir};

/// A retrieved chunk of knowledge-base text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Passage {
    pub source: String,
    pub content: String,
    pub score: f32,
}

/// Retrieval capability consumed by the inquiry pipeline.
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    /// Whether the index holds any passages.
    async fn is_ready(&self) -> bool;

    /// The `k` passages most similar to `query`, best first.
    async fn similarity_search(&self, query: &str, k: usize) -> KnowledgeResult<Vec<Passage>>;
}

struct IndexedChunk {
    source: String,
    content: String,
    vector: Vec<f32>,
}

/// Owned knowledge base: splitter + embedder + index.
pub struct KnowledgeBase {
    embedder: Arc<dyn Embedder>,
    splitter: TextSplitter,
    chunks: RwLock<Vec<IndexedChunk>>,
}

impl KnowledgeBase {
    pub fn new(embedder: Arc<dyn Embedder>, splitter: TextSplitter) -> Self {
        Self {
            embedder,
            splitter,
            chunks: RwLock::new(Vec::new()),
        }
    }

    /// Rebuild the index from every `*.txt` file in `dir`.
    pub async fn initialize_from_dir(&self, dir: &Path) -> KnowledgeResult<usize> {
        let docs = load_text_dir(dir).await?;
        if docs.is_empty() {
            return Err(KnowledgeError::Empty(format!(
                "no .txt files in {}",
                dir.display()
            )));
        }
        self.rebuild(docs).await
    }

    /// Replace the whole index. The old index stays live until the new one
    /// is fully embedded.
    pub async fn rebuild(&self, docs: Vec<SourceDocument>) -> KnowledgeResult<usize> {
        let indexed = self.index_documents(&docs).await?;
        if indexed.is_empty() {
            return Err(KnowledgeError::Empty("documents contain no text".into()));
        }
        let count = indexed.len();
        *self.chunks.write().await = indexed;
        tracing::info!(
            documents = docs.len(),
            chunks = count,
            model = self.embedder.model_name(),
            "knowledge base rebuilt"
        );
        Ok(count)
    }

    /// Append one document's chunks. Returns the number of chunks added.
    pub async fn add_document(&self, doc: SourceDocument) -> KnowledgeResult<usize> {
        let indexed = self.index_documents(std::slice::from_ref(&doc)).await?;
        if indexed.is_empty() {
            return Err(KnowledgeError::Empty(format!("{} contains no text", doc.source)));
        }
        let added = indexed.len();
        self.chunks.write().await.extend(indexed);
        tracing::info!(source = %doc.source, chunks = added, "document added to knowledge base");
        Ok(added)
    }

    pub async fn chunk_count(&self) -> usize {
        self.chunks.read().await.len()
    }

    async fn index_documents(&self, docs: &[SourceDocument]) -> KnowledgeResult<Vec<IndexedChunk>> {
        let mut sources = Vec::new();
        let mut contents = Vec::new();
        for doc in docs {
            for chunk in self.splitter.split(&doc.text) {
                sources.push(doc.source.clone());
                contents.push(chunk);
            }
        }
        if contents.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = self.embedder.embed(&contents).await?;
        if vectors.len() != contents.len() {
            return Err(KnowledgeError::Embedding(format!(
                "embedder returned {} vectors for {} chunks",
                vectors.len(),
                contents.len()
            )));
        }

        Ok(sources
            .into_iter()
            .zip(contents)
            .zip(vectors)
            .map(|((source, content), vector)| IndexedChunk {
                source,
                content,
                vector,
            })
            .collect())
    }
}

#[async_trait]
impl SimilaritySearch for KnowledgeBase {
    async fn is_ready(&self) -> bool {
        !self.chunks.read().await.is_empty()
    }

    async fn similarity_search(&self, query: &str, k: usize) -> KnowledgeResult<Vec<Passage>> {
        if !self.is_ready().await {
            return Err(KnowledgeError::NotReady);
        }
        let query_vec = self
            .embedder
            .embed(&[query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| KnowledgeError::Embedding("no vector for query".into()))?;

        let chunks = self.chunks.read().await;
        let mut scored: Vec<(f32, &IndexedChunk)> = chunks
            .iter()
            .map(|c| (cosine_similarity(&query_vec, &c.vector), c))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(score, c)| Passage {
                source: c.source.clone(),
                content: c.content.clone(),
                score,
            })
            .collect())
    }
}
