use crate::error::{Result, VectorStoreError};
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_EMBEDDING_MODEL: &str = "hf.co/CompendiumLabs/bge-base-en-v1.5-gguf";
pub const DEFAULT_LANGUAGE_MODEL: &str = "hf.co/bartowski/Llama-3.2-1B-Instruct-GGUF";
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_STUB_DIMENSION: usize = 768;

pub const ENV_EMBEDDING_MODEL: &str = "EMBEDDING_MODEL";
pub const ENV_LANGUAGE_MODEL: &str = "LANGUAGE_MODEL";
pub const ENV_EMBEDDING_MODE: &str = "MINIRAG_EMBEDDING_MODE";
pub const ENV_OLLAMA_HOST: &str = "OLLAMA_HOST";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "MINIRAG_REQUEST_TIMEOUT_SECS";
pub const ENV_STUB_DIMENSION: &str = "MINIRAG_STUB_DIMENSION";

/// Which embedding backend to build.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingMode {
    Ollama,
    Stub,
}

impl EmbeddingMode {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "stub" => Ok(Self::Stub),
            other => Err(VectorStoreError::Config(format!(
                "Unsupported {ENV_EMBEDDING_MODE} '{other}' (expected 'ollama' or 'stub')"
            ))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::Stub => "stub",
        }
    }
}

/// Settings resolved once at startup and passed to constructors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RagConfig {
    pub embedding_model: String,
    /// Carried for the generation step of the surrounding workflow.
    pub language_model: String,
    pub embedding_mode: EmbeddingMode,
    pub ollama_host: String,
    pub request_timeout_secs: u64,
    pub stub_dimension: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            language_model: DEFAULT_LANGUAGE_MODEL.to_string(),
            embedding_mode: EmbeddingMode::Ollama,
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            stub_dimension: DEFAULT_STUB_DIMENSION,
        }
    }
}

impl RagConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(model) = get(ENV_EMBEDDING_MODEL) {
            config.embedding_model = model;
        }
        if let Some(model) = get(ENV_LANGUAGE_MODEL) {
            config.language_model = model;
        }
        if let Some(mode) = get(ENV_EMBEDDING_MODE) {
            config.embedding_mode = EmbeddingMode::parse(&mode)?;
        }
        if let Some(host) = get(ENV_OLLAMA_HOST) {
            config.ollama_host = normalize_host(&host);
        }
        if let Some(raw) = get(ENV_REQUEST_TIMEOUT_SECS) {
            let secs: u64 = parse_number(ENV_REQUEST_TIMEOUT_SECS, &raw)?;
            if secs == 0 {
                return Err(VectorStoreError::Config(format!(
                    "{ENV_REQUEST_TIMEOUT_SECS} must be at least 1"
                )));
            }
            config.request_timeout_secs = secs;
        }
        if let Some(raw) = get(ENV_STUB_DIMENSION) {
            let dimension: usize = parse_number(ENV_STUB_DIMENSION, &raw)?;
            if dimension == 0 {
                return Err(VectorStoreError::Config(format!(
                    "{ENV_STUB_DIMENSION} must be at least 1"
                )));
            }
            config.stub_dimension = dimension;
        }
        Ok(config)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Accepts `host:port` as well as full URLs and drops a trailing slash.
#[must_use]
pub fn normalize_host(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.parse::<T>()
        .map_err(|_| VectorStoreError::Config(format!("{key} must be a number, got '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = RagConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RagConfig::default());
        assert_eq!(config.embedding_model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(config.language_model, DEFAULT_LANGUAGE_MODEL);
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = RagConfig::from_lookup(lookup(&[
            (ENV_EMBEDDING_MODEL, "nomic-embed-text"),
            (ENV_LANGUAGE_MODEL, "llama3.2"),
            (ENV_EMBEDDING_MODE, "STUB"),
            (ENV_OLLAMA_HOST, "10.0.0.5:11434/"),
            (ENV_REQUEST_TIMEOUT_SECS, "5"),
            (ENV_STUB_DIMENSION, "16"),
        ]))
        .unwrap();

        assert_eq!(
            config,
            RagConfig {
                embedding_model: "nomic-embed-text".to_string(),
                language_model: "llama3.2".to_string(),
                embedding_mode: EmbeddingMode::Stub,
                ollama_host: "http://10.0.0.5:11434".to_string(),
                request_timeout_secs: 5,
                stub_dimension: 16,
            }
        );
    }

    #[test]
    fn blank_values_are_ignored() {
        let config =
            RagConfig::from_lookup(lookup(&[(ENV_EMBEDDING_MODEL, "  "), (ENV_EMBEDDING_MODE, "")]))
                .unwrap();
        assert_eq!(config.embedding_model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(config.embedding_mode, EmbeddingMode::Ollama);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for pairs in [
            [(ENV_EMBEDDING_MODE, "onnx")],
            [(ENV_REQUEST_TIMEOUT_SECS, "soon")],
            [(ENV_REQUEST_TIMEOUT_SECS, "0")],
            [(ENV_STUB_DIMENSION, "0")],
        ] {
            let err = RagConfig::from_lookup(lookup(&pairs)).unwrap_err();
            assert!(matches!(err, VectorStoreError::Config(_)), "{err}");
        }
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = RagConfig::from_lookup(lookup(&[(ENV_REQUEST_TIMEOUT_SECS, "0")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: MINIRAG_REQUEST_TIMEOUT_SECS must be at least 1"
        );
    }

    #[test]
    fn https_hosts_are_kept() {
        assert_eq!(
            normalize_host("https://embed.internal/"),
            "https://embed.internal"
        );
        assert_eq!(normalize_host("localhost:11434"), "http://localhost:11434");
    }
}
