use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectorStoreError>;

#[derive(Error, Debug)]
pub enum VectorStoreError {
    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Cosine similarity is undefined for a zero-norm vector")]
    DegenerateVector,

    #[error("Cosine similarity is undefined for non-finite vector components")]
    NonFiniteVector,

    #[error("top_n must be at least 1, got {0}")]
    InvalidTopN(usize),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl VectorStoreError {
    pub(crate) fn embedding(message: impl Into<String>) -> Self {
        Self::EmbeddingError(message.into())
    }
}
