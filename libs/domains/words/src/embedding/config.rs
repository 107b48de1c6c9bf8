use std::sync::Arc;

use core_config::{ConfigError, FromEnv, env_or_default};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{EmbeddingProvider, HashingProvider, OpenAICompatibleConfig, OpenAICompatibleProvider};
use crate::settings::{DEFAULT_EMBEDDING_DIMENSION, DEFAULT_EMBEDDING_MODEL};

/// Embedding provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderType {
    /// Remote server speaking the OpenAI embeddings API
    OpenAICompatible,
    /// Local trigram hashing, no network
    Hashing,
}

impl std::str::FromStr for EmbeddingProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" | "openai_compatible" => Ok(Self::OpenAICompatible),
            "hashing" => Ok(Self::Hashing),
            other => Err(format!("unknown embedding provider '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderType,
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderType::OpenAICompatible,
            base_url: "http://localhost:8081/v1".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl FromEnv for EmbeddingConfig {
    /// Reads from environment variables:
    /// - EMBEDDING_PROVIDER: "openai" (default) or "hashing"
    /// - EMBEDDING_BASE_URL: defaults to http://localhost:8081/v1
    /// - EMBEDDING_API_KEY: optional bearer token
    /// - EMBEDDING_TIMEOUT_SECS: defaults to 30
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let provider = env_or_default("EMBEDDING_PROVIDER", "openai")
            .parse::<EmbeddingProviderType>()
            .map_err(|details| ConfigError::ParseError {
                key: "EMBEDDING_PROVIDER".to_string(),
                details,
            })?;

        let timeout_secs = env_or_default("EMBEDDING_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e: std::num::ParseIntError| ConfigError::ParseError {
                key: "EMBEDDING_TIMEOUT_SECS".to_string(),
                details: e.to_string(),
            })?;

        Ok(Self {
            provider,
            base_url: env_or_default("EMBEDDING_BASE_URL", &defaults.base_url),
            api_key: std::env::var("EMBEDDING_API_KEY").ok().filter(|k| !k.is_empty()),
            timeout_secs,
        })
    }
}

/// Builds the configured provider for the fixed `all-MiniLM-L6-v2` model.
pub fn create_embedding_provider(
    config: &EmbeddingConfig,
) -> crate::WordsResult<Arc<dyn EmbeddingProvider>> {
    let provider: Arc<dyn EmbeddingProvider> = match config.provider {
        EmbeddingProviderType::OpenAICompatible => {
            let mut provider_config = OpenAICompatibleConfig::new(
                config.base_url.clone(),
                DEFAULT_EMBEDDING_MODEL,
                DEFAULT_EMBEDDING_DIMENSION,
            )
            .with_timeout(config.timeout_secs);
            if let Some(api_key) = &config.api_key {
                provider_config = provider_config.with_api_key(api_key.clone());
            }
            info!(
                base_url = %config.base_url,
                model = DEFAULT_EMBEDDING_MODEL,
                "Using OpenAI-compatible embedding provider"
            );
            Arc::new(OpenAICompatibleProvider::new(provider_config)?)
        }
        EmbeddingProviderType::Hashing => {
            info!(
                dimension = DEFAULT_EMBEDDING_DIMENSION,
                "Using local hashing embedding provider"
            );
            Arc::new(HashingProvider::new(DEFAULT_EMBEDDING_DIMENSION))
        }
    };

    Ok(provider)
}
