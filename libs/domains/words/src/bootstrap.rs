//! Startup population of the vocabulary collection.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

use crate::embedding::EmbeddingProvider;
use crate::error::{WordsError, WordsResult};
use crate::models::{VectorParams, VectorPoint};
use crate::settings::WordsSettings;
use crate::store::{VectorStore, ensure_collection};

/// What a bootstrap run did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BootstrapOutcome {
    pub collection_created: bool,
    pub points_inserted: usize,
    pub points_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum BootstrapState {
    #[default]
    Pending,
    Ready(BootstrapOutcome),
    Failed { error: String },
}

impl BootstrapState {
    pub fn is_ready(&self) -> bool {
        matches!(self, BootstrapState::Ready(_))
    }
}

/// Shared, observable bootstrap state
#[derive(Debug, Clone, Default)]
pub struct BootstrapStatus(Arc<RwLock<BootstrapState>>);

impl BootstrapStatus {
    pub async fn get(&self) -> BootstrapState {
        self.0.read().await.clone()
    }

    pub async fn set(&self, state: BootstrapState) {
        *self.0.write().await = state;
    }
}

/// Ensures the vocabulary collection exists and holds one vector per word.
pub struct VocabularyBootstrapper {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    settings: WordsSettings,
}

impl VocabularyBootstrapper {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        settings: WordsSettings,
    ) -> Self {
        Self {
            embedder,
            store,
            settings,
        }
    }

    /// Idempotent: population only happens while the collection has no points.
    ///
    /// # Errors
    /// `DimensionMismatch` when the existing collection or a produced vector does not
    /// match the embedder's dimension, otherwise any store or embedding failure.
    #[instrument(skip(self), fields(collection = %self.settings.collection_name))]
    pub async fn initialize(&self) -> WordsResult<BootstrapOutcome> {
        let name = self.settings.collection_name.as_str();
        let dimension = self.embedder.dimension();

        let collection_created =
            ensure_collection(self.store.as_ref(), name, VectorParams::cosine(dimension)).await?;

        let info = self.store.collection_info(name).await?;
        if let Some(size) = info.vector_size.filter(|size| *size != dimension) {
            return Err(WordsError::DimensionMismatch {
                expected: dimension,
                actual: size,
            });
        }

        if info.points_count > 0 {
            info!(
                points_count = info.points_count,
                "Collection already populated, skipping"
            );
            return Ok(BootstrapOutcome {
                collection_created,
                points_inserted: 0,
                points_count: info.points_count,
            });
        }

        let vocabulary = &self.settings.vocabulary;
        if vocabulary.is_empty() {
            return Ok(BootstrapOutcome {
                collection_created,
                points_inserted: 0,
                points_count: 0,
            });
        }

        let vectors = self.embedder.embed_batch(vocabulary).await?;
        if vectors.len() != vocabulary.len() {
            return Err(WordsError::Embedding(format!(
                "Expected {} embeddings, got {}",
                vocabulary.len(),
                vectors.len()
            )));
        }

        let points = vocabulary
            .iter()
            .zip(vectors)
            .enumerate()
            .map(|(id, (word, vector))| {
                if vector.len() != dimension {
                    return Err(WordsError::DimensionMismatch {
                        expected: dimension,
                        actual: vector.len(),
                    });
                }
                Ok(VectorPoint::new(id as u64, vector, word.clone()))
            })
            .collect::<WordsResult<Vec<_>>>()?;

        let points_inserted = points.len();
        self.store.upsert(name, points).await?;
        info!(points_inserted, "Populated vocabulary collection");

        Ok(BootstrapOutcome {
            collection_created,
            points_inserted,
            points_count: points_inserted as u64,
        })
    }

    /// Runs [`initialize`](Self::initialize) and records the result in `status`.
    ///
    /// Failures are logged and swallowed so the service can start degraded.
    /// A dimension mismatch is a configuration error and is returned.
    pub async fn initialize_and_record(&self, status: &BootstrapStatus) -> WordsResult<()> {
        match self.initialize().await {
            Ok(outcome) => {
                status.set(BootstrapState::Ready(outcome)).await;
                Ok(())
            }
            Err(e @ WordsError::DimensionMismatch { .. }) => {
                error!(error = %e, "Embedding dimension does not match the vector store");
                status
                    .set(BootstrapState::Failed {
                        error: e.to_string(),
                    })
                    .await;
                Err(e)
            }
            Err(e) => {
                error!(error = %e, "Vocabulary bootstrap failed, continuing without it");
                status
                    .set(BootstrapState::Failed {
                        error: e.to_string(),
                    })
                    .await;
                Ok(())
            }
        }
    }
}
