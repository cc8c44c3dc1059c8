//! Knowledge base error types.

use thiserror::Error;

/// Errors raised while building or querying the knowledge base.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("knowledge base not initialized")]
    NotReady,

    #[error("no content to index: {0}")]
    Empty(String),
}

/// Convenience alias for knowledge base results.
pub type KnowledgeResult<T> = Result<T, KnowledgeError>;
