use crate::config::{EmbeddingMode, RagConfig};
use crate::error::Result;
use crate::ollama::OllamaEmbedder;
use crate::types::{Embedding, TextInput};
use async_trait::async_trait;

/// Maps text to fixed-length vectors.
///
/// Implementations return one embedding per input text, in input order.
/// Failures are reported as [`crate::VectorStoreError::EmbeddingError`];
/// callers do not retry.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn model_id(&self) -> &str;

    async fn embed(&self, input: &TextInput) -> Result<Vec<Embedding>>;
}

#[async_trait]
impl<T: Embedder + ?Sized> Embedder for Box<T> {
    fn model_id(&self) -> &str {
        (**self).model_id()
    }

    async fn embed(&self, input: &TextInput) -> Result<Vec<Embedding>> {
        (**self).embed(input).await
    }
}

/// Deterministic offline embedder: the same text always maps to the same
/// unit vector.
#[derive(Clone, Debug)]
pub struct StubEmbedder {
    model_id: String,
    dimension: usize,
}

impl StubEmbedder {
    #[must_use]
    pub fn new(model_id: impl Into<String>, dimension: usize) -> Self {
        Self {
            model_id: model_id.into(),
            dimension: dimension.max(1),
        }
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn embed(&self, input: &TextInput) -> Result<Vec<Embedding>> {
        Ok(input
            .as_texts()
            .iter()
            .map(|text| stub_embed(text, self.dimension))
            .collect())
    }
}

/// Backend selected by [`RagConfig::embedding_mode`].
pub enum AnyEmbedder {
    Ollama(OllamaEmbedder),
    Stub(StubEmbedder),
}

impl AnyEmbedder {
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        match config.embedding_mode {
            EmbeddingMode::Ollama => Ok(Self::Ollama(OllamaEmbedder::from_config(config)?)),
            EmbeddingMode::Stub => Ok(Self::Stub(StubEmbedder::new(
                config.embedding_model.clone(),
                config.stub_dimension,
            ))),
        }
    }
}

#[async_trait]
impl Embedder for AnyEmbedder {
    fn model_id(&self) -> &str {
        match self {
            Self::Ollama(inner) => inner.model_id(),
            Self::Stub(inner) => inner.model_id(),
        }
    }

    async fn embed(&self, input: &TextInput) -> Result<Vec<Embedding>> {
        match self {
            Self::Ollama(inner) => inner.embed(input).await,
            Self::Stub(inner) => inner.embed(input).await,
        }
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Splitmix64 sequence seeded from an FNV-1a hash of the text, yielding
/// components in `[-1, 1)`.
struct HashStream {
    state: u64,
}

impl HashStream {
    fn seeded(text: &str, dimension: usize) -> Self {
        let hash = text
            .bytes()
            .fold(FNV_OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME));
        Self {
            state: hash ^ (dimension as u64).wrapping_mul(GOLDEN_GAMMA),
        }
    }
}

impl Iterator for HashStream {
    type Item = f32;

    #[allow(clippy::cast_precision_loss)]
    fn next(&mut self) -> Option<f32> {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        // 24 high bits fit the f32 mantissa exactly.
        let unit = (z >> 40) as f32 / (1_u32 << 24) as f32;
        Some(unit.mul_add(2.0, -1.0))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn stub_embed(text: &str, dimension: usize) -> Embedding {
    let raw: Vec<f32> = HashStream::seeded(text, dimension).take(dimension).collect();
    let norm = raw
        .iter()
        .map(|v| f64::from(*v) * f64::from(*v))
        .sum::<f64>()
        .sqrt();
    if norm == 0.0 {
        return raw;
    }
    raw.into_iter()
        .map(|v| (f64::from(v) / norm) as f32)
        .collect()
}
