use std::path::PathBuf;
use std::sync::Arc;

use core_config::{ConfigError, FromEnv, env_or_default};
use tracing::info;

use super::{LocalStore, QdrantConfig, QdrantStore, VectorStore};
use crate::error::WordsResult;

pub const DEFAULT_STORE_PATH: &str = "./qdrant_data";

/// Which vector store backs the service
#[derive(Debug, Clone)]
pub enum StoreBackend {
    /// Embedded store persisted under a local directory
    Local { path: PathBuf },
    /// Remote Qdrant server
    Qdrant(QdrantConfig),
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Local {
                path: PathBuf::from(DEFAULT_STORE_PATH),
            },
        }
    }
}

impl FromEnv for StoreConfig {
    /// Reads from environment variables:
    /// - QDRANT_URL: when set, use a remote Qdrant server
    /// - QDRANT_API_KEY: optional
    /// - QDRANT_TIMEOUT_SECS: defaults to 30
    /// - VECTOR_STORE_PATH: local store directory, defaults to ./qdrant_data
    fn from_env() -> Result<Self, ConfigError> {
        let backend = match std::env::var("QDRANT_URL").ok().filter(|u| !u.is_empty()) {
            Some(url) => {
                let timeout_secs = env_or_default("QDRANT_TIMEOUT_SECS", "30")
                    .parse::<u64>()
                    .map_err(|e| ConfigError::ParseError {
                        key: "QDRANT_TIMEOUT_SECS".to_string(),
                        details: e.to_string(),
                    })?;

                let mut config = QdrantConfig::new(url).with_timeout(timeout_secs);
                if let Ok(api_key) = std::env::var("QDRANT_API_KEY") {
                    config = config.with_api_key(api_key);
                }
                StoreBackend::Qdrant(config)
            }
            None => StoreBackend::Local {
                path: PathBuf::from(env_or_default("VECTOR_STORE_PATH", DEFAULT_STORE_PATH)),
            },
        };

        Ok(Self { backend })
    }
}

/// Opens the configured vector store.
pub fn create_vector_store(config: &StoreConfig) -> WordsResult<Arc<dyn VectorStore>> {
    let store: Arc<dyn VectorStore> = match &config.backend {
        StoreBackend::Local { path } => Arc::new(LocalStore::open(path)?),
        StoreBackend::Qdrant(qdrant) => {
            info!(url = %qdrant.url, "Using Qdrant vector store");
            Arc::new(QdrantStore::new(qdrant.clone())?)
        }
    };

    Ok(store)
}
