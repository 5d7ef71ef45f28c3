use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-length vector produced by an [`crate::Embedder`].
pub type Embedding = Vec<f32>;

/// Text accepted at the store boundary: one passage or an ordered batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    Single(String),
    Batch(Vec<String>),
}

impl TextInput {
    /// Texts to send to the embedder, in order.
    #[must_use]
    pub fn as_texts(&self) -> &[String] {
        match self {
            Self::Single(text) => std::slice::from_ref(text),
            Self::Batch(texts) => texts,
        }
    }
}

impl fmt::Display for TextInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(text) => f.write_str(text),
            Self::Batch(texts) => f.write_str(&texts.join(" | ")),
        }
    }
}

impl From<&str> for TextInput {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for TextInput {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for TextInput {
    fn from(value: Vec<String>) -> Self {
        Self::Batch(value)
    }
}

/// A stored `(text, embedding)` pair. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    text: TextInput,
    embedding: Embedding,
}

impl Record {
    pub(crate) const fn new(text: TextInput, embedding: Embedding) -> Self {
        Self { text, embedding }
    }

    #[must_use]
    pub const fn text(&self) -> &TextInput {
        &self.text
    }

    #[must_use]
    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub text: TextInput,
    pub score: f32,
    /// Insertion index of the matching record.
    pub position: usize,
}
