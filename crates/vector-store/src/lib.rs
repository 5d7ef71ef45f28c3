//! # minirag vector store
//!
//! In-memory retrieval for retrieval-augmented generation: text passages are
//! stored next to their embeddings and queried by cosine similarity.
//!
//! ## Architecture
//!
//! ```text
//! insert(text)
//!     │
//!     ├──> Embedder (Ollama /api/embed | stub)
//!     │      └─> Vec<f32>
//!     │
//!     └──> VectorStore (append-only Vec<Record>)
//!
//! query(text, top_n)
//!     │
//!     ├──> Embedder ──> query vector
//!     └──> linear scan ──> cosine similarity ──> stable sort ──> top_n
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use minirag_vector_store::{AnyEmbedder, RagConfig, VectorStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = RagConfig::from_env()?;
//!     let mut store = VectorStore::new(AnyEmbedder::from_config(&config)?);
//!
//!     store.insert("Cats sleep for around 13 to 16 hours a day.").await?;
//!     store.insert("A cat's nose print is unique.").await?;
//!
//!     for hit in store.query("How long do cats sleep?", 1).await? {
//!         println!("{:.2} {}", hit.score, hit.text);
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod embeddings;
mod error;
mod ollama;
mod similarity;
mod store;
mod types;

pub use config::{
    normalize_host, EmbeddingMode, RagConfig, DEFAULT_EMBEDDING_MODEL, DEFAULT_LANGUAGE_MODEL,
    DEFAULT_OLLAMA_HOST, ENV_EMBEDDING_MODE, ENV_EMBEDDING_MODEL, ENV_LANGUAGE_MODEL,
    ENV_OLLAMA_HOST, ENV_REQUEST_TIMEOUT_SECS, ENV_STUB_DIMENSION,
};
pub use embeddings::{AnyEmbedder, Embedder, StubEmbedder};
pub use error::{Result, VectorStoreError};
pub use ollama::OllamaEmbedder;
pub use similarity::cosine_similarity;
pub use store::{VectorStore, DEFAULT_TOP_N};
pub use types::{Embedding, Record, SearchResult, TextInput};
