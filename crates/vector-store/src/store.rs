use crate::embeddings::Embedder;
use crate::error::{Result, VectorStoreError};
use crate::similarity::cosine_similarity;
use crate::types::{Record, SearchResult, TextInput};

/// Number of hits returned when the caller does not ask for more.
pub const DEFAULT_TOP_N: usize = 1;

/// Append-only in-memory store answering top-N cosine similarity queries
/// with a linear scan.
pub struct VectorStore<E> {
    records: Vec<Record>,
    embedder: E,
}

impl<E: Embedder> VectorStore<E> {
    pub fn new(embedder: E) -> Self {
        log::info!(
            "Initializing VectorStore (embedding model: {})",
            embedder.model_id()
        );
        Self {
            records: Vec::new(),
            embedder,
        }
    }

    /// Embeds `text` and appends exactly one record.
    ///
    /// Only the first embedding returned by the embedder is kept, even when
    /// `text` is a batch. On error the store is left untouched.
    pub async fn insert(&mut self, text: impl Into<TextInput>) -> Result<()> {
        let text = text.into();
        let embedding = self
            .embedder
            .embed(&text)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| VectorStoreError::embedding("Empty embedding result"))?;

        if let Some(expected) = self.dimension() {
            if embedding.len() != expected {
                return Err(VectorStoreError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                });
            }
        }

        log::debug!(
            "Inserted record #{} ({} dims): {text}",
            self.records.len(),
            embedding.len()
        );
        self.records.push(Record::new(text, embedding));
        Ok(())
    }

    /// Returns up to `top_n` records ordered by descending similarity to
    /// `query_text`. Equal scores keep insertion order.
    pub async fn query(&self, query_text: &str, top_n: usize) -> Result<Vec<SearchResult>> {
        if top_n == 0 {
            return Err(VectorStoreError::InvalidTopN(top_n));
        }
        log::debug!("Searching for: '{query_text}' (top_n: {top_n})");

        let query_embedding = self
            .embedder
            .embed(&TextInput::from(query_text))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| VectorStoreError::embedding("Empty embedding result"))?;

        let mut results = self
            .records
            .iter()
            .enumerate()
            .map(|(position, record)| {
                // Stored dimension is the expected one in a mismatch report.
                let score = cosine_similarity(record.embedding(), &query_embedding)?;
                Ok(SearchResult {
                    text: record.text().clone(),
                    score,
                    position,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // `sort_by` is stable, so ties stay in insertion order.
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(top_n);

        log::debug!("Found {} results", results.len());
        Ok(results)
    }

    /// Dimension fixed by the first inserted record.
    pub fn dimension(&self) -> Option<usize> {
        self.records.first().map(|record| record.embedding().len())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub const fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Get total number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if store is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
