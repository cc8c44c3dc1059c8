//! Retrieval collaborator for the inquiry pipeline.
//!
//! Documents (plain-text files, uploaded PDFs) are split into overlapping
//! chunks, embedded, and held in an in-memory index. Queries return the
//! top-k most similar passages by cosine similarity.

pub mod chunk;
pub mod embedding;
pub mod error;
pub mod index;
pub mod loader;

pub use chunk::TextSplitter;
pub use embedding::{Embedder, EmbeddingConfig, HashingEmbedder, OpenAiEmbedder, create_embedder};
pub use error::{KnowledgeError, KnowledgeResult};
pub use index::{KnowledgeBase, Passage, SimilaritySearch};
pub use loader::{SourceDocument, extract_pdf_text, load_text_dir};
