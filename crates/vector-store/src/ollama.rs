//! Client for an Ollama-compatible `/api/embed` endpoint.

use crate::config::RagConfig;
use crate::embeddings::Embedder;
use crate::error::{Result, VectorStoreError};
use crate::types::{Embedding, TextInput};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub struct OllamaEmbedder {
    client: Client,
    model: String,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a TextInput,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Embedding>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl OllamaEmbedder {
    pub fn new(model: impl Into<String>, host: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            VectorStoreError::Config(format!("Failed to build HTTP client: {e}"))
        })?;
        Ok(Self {
            client,
            model: model.into(),
            endpoint: format!("{}/api/embed", host.trim_end_matches('/')),
        })
    }

    pub fn from_config(config: &RagConfig) -> Result<Self> {
        Self::new(
            config.embedding_model.clone(),
            &config.ollama_host,
            config.request_timeout(),
        )
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn embed(&self, input: &TextInput) -> Result<Vec<Embedding>> {
        let expected = input.as_texts().len();
        log::debug!(
            "Requesting {expected} embedding(s) from {} (model: {})",
            self.endpoint,
            self.model
        );

        let request = EmbedRequest {
            model: &self.model,
            input,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                VectorStoreError::embedding(format!(
                    "Request to {} failed: {e}",
                    self.endpoint
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map_or(body, |parsed| parsed.error);
            return Err(VectorStoreError::embedding(format!(
                "Embedding service returned {status}: {message}"
            )));
        }

        let parsed: EmbedResponse = response.json().await.map_err(|e| {
            VectorStoreError::embedding(format!("Failed to parse embedding response: {e}"))
        })?;

        if parsed.embeddings.len() != expected {
            return Err(VectorStoreError::embedding(format!(
                "Embedding service returned {} embedding(s) for {expected} input(s)",
                parsed.embeddings.len()
            )));
        }

        Ok(parsed.embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serves one canned HTTP response and hands back the request body.
    async fn serve_once(status_line: &str, body: &str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request_body = read_request_body(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let _ = tx.send(request_body);
        });

        (format!("http://{addr}"), rx)
    }

    async fn read_request_body(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0_u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    return String::from_utf8_lossy(&buf[header_end + 4..]).into_owned();
                }
            }
        }
        String::new()
    }

    fn embedder(host: &str) -> OllamaEmbedder {
        OllamaEmbedder::new("bge-test", host, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn sends_model_and_single_input() {
        let (host, request) = serve_once("200 OK", r#"{"embeddings":[[0.5,0.25]]}"#).await;
        let embeddings = embedder(&host).embed(&"why is the sky blue".into()).await.unwrap();
        assert_eq!(embeddings, vec![vec![0.5_f32, 0.25]]);

        let body: serde_json::Value = serde_json::from_str(&request.await.unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"model": "bge-test", "input": "why is the sky blue"})
        );
    }

    #[tokio::test]
    async fn sends_batches_as_arrays() {
        let (host, request) =
            serve_once("200 OK", r#"{"embeddings":[[1.0,0.0],[0.0,1.0]]}"#).await;
        let input = TextInput::from(vec!["a".to_string(), "b".to_string()]);
        let embeddings = embedder(&host).embed(&input).await.unwrap();
        assert_eq!(embeddings.len(), 2);

        let body: serde_json::Value = serde_json::from_str(&request.await.unwrap()).unwrap();
        assert_eq!(body["input"], serde_json::json!(["a", "b"]));
    }

    #[tokio::test]
    async fn surfaces_service_error_message() {
        let (host, _request) = serve_once(
            "404 Not Found",
            r#"{"error":"model \"bge-test\" not found, try pulling it first"}"#,
        )
        .await;
        let err = embedder(&host).embed(&"x".into()).await.unwrap_err();
        let VectorStoreError::EmbeddingError(message) = err else {
            panic!("expected EmbeddingError");
        };
        assert!(message.contains("404"), "{message}");
        assert!(message.contains("try pulling it first"), "{message}");
    }

    #[tokio::test]
    async fn rejects_malformed_payload() {
        let (host, _request) = serve_once("200 OK", r#"{"embedding":"nope"}"#).await;
        let err = embedder(&host).embed(&"x".into()).await.unwrap_err();
        assert!(matches!(err, VectorStoreError::EmbeddingError(_)), "{err}");
    }

    #[tokio::test]
    async fn rejects_count_mismatch() {
        let (host, _request) = serve_once("200 OK", r#"{"embeddings":[]}"#).await;
        let err = embedder(&host).embed(&"x".into()).await.unwrap_err();
        assert!(err.to_string().contains("0 embedding(s) for 1 input(s)"), "{err}");
    }

    #[tokio::test]
    async fn unreachable_service_is_embedding_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = embedder(&format!("http://{addr}"))
            .embed(&"x".into())
            .await
            .unwrap_err();
        assert!(matches!(err, VectorStoreError::EmbeddingError(_)), "{err}");
    }

    #[test]
    fn endpoint_is_built_from_host() {
        let embedder =
            OllamaEmbedder::from_config(&RagConfig::default()).unwrap();
        assert_eq!(embedder.endpoint(), "http://localhost:11434/api/embed");
        assert_eq!(embedder.model_id(), crate::config::DEFAULT_EMBEDDING_MODEL);
    }
}
