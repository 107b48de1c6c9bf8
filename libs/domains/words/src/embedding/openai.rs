use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{EmbeddingProvider, EmbeddingProviderType};
use crate::error::{WordsError, WordsResult};

/// Connection settings for an OpenAI-compatible `/embeddings` endpoint
#[derive(Debug, Clone)]
pub struct OpenAICompatibleConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub dimension: usize,
    pub timeout_secs: u64,
}

impl OpenAICompatibleConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            model: model.into(),
            dimension,
            timeout_secs: 30,
        }
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Embeddings served by any OpenAI-compatible server
/// (text-embeddings-inference, Ollama, LocalAI, ...)
pub struct OpenAICompatibleProvider {
    client: Client,
    config: OpenAICompatibleConfig,
}

impl OpenAICompatibleProvider {
    pub fn new(config: OpenAICompatibleConfig) -> WordsResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WordsError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.config.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[async_trait]
impl EmbeddingProvider for OpenAICompatibleProvider {
    fn provider_type(&self) -> EmbeddingProviderType {
        EmbeddingProviderType::OpenAICompatible
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> WordsResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
        };

        let mut builder = self.client.post(self.endpoint()).json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| WordsError::Embedding(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(WordsError::Embedding(format!(
                "Embedding API error ({}): {}",
                status, error_text
            )));
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| WordsError::Embedding(format!("Invalid embedding response: {}", e)))?;

        parse_embeddings(embedding_response, texts.len(), self.config.dimension)
    }
}

/// Orders the returned vectors by input index and checks count and size.
fn parse_embeddings(
    response: EmbeddingResponse,
    expected_count: usize,
    dimension: usize,
) -> WordsResult<Vec<Vec<f32>>> {
    let mut data = response.data;
    if data.len() != expected_count {
        return Err(WordsError::Embedding(format!(
            "Expected {} embeddings, got {}",
            expected_count,
            data.len()
        )));
    }

    // Sort by index to maintain order
    data.sort_by_key(|d| d.index);

    data.into_iter()
        .map(|d| {
            if d.embedding.len() != dimension {
                return Err(WordsError::DimensionMismatch {
                    expected: dimension,
                    actual: d.embedding.len(),
                });
            }
            Ok(d.embedding)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: serde_json::Value) -> EmbeddingResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_parse_embeddings_sorts_by_index() {
        let parsed = parse_embeddings(
            response(serde_json::json!({
                "object": "list",
                "data": [
                    {"object": "embedding", "index": 1, "embedding": [0.0, 1.0]},
                    {"object": "embedding", "index": 0, "embedding": [1.0, 0.0]}
                ],
                "model": "all-MiniLM-L6-v2"
            })),
            2,
            2,
        )
        .unwrap();

        assert_eq!(parsed, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_parse_embeddings_rejects_wrong_dimension() {
        let result = parse_embeddings(
            response(serde_json::json!({
                "data": [{"index": 0, "embedding": [1.0, 0.0, 0.0]}]
            })),
            1,
            384,
        );

        assert!(matches!(
            result,
            Err(WordsError::DimensionMismatch {
                expected: 384,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_parse_embeddings_rejects_missing_items() {
        let result = parse_embeddings(response(serde_json::json!({"data": []})), 1, 2);
        assert!(matches!(result, Err(WordsError::Embedding(_))));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let provider = OpenAICompatibleProvider::new(OpenAICompatibleConfig::new(
            "http://localhost:8081/v1/",
            "all-MiniLM-L6-v2",
            384,
        ))
        .unwrap();

        assert_eq!(provider.endpoint(), "http://localhost:8081/v1/embeddings");
        assert_eq!(provider.dimension(), 384);
    }
}
