use async_trait::async_trait;

use super::EmbeddingProviderType;
use crate::error::{WordsError, WordsResult};

/// Trait for embedding generation providers
///
/// Every vector an implementation returns has exactly [`dimension`](Self::dimension) components.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the provider type
    fn provider_type(&self) -> EmbeddingProviderType;

    /// Output vector size
    fn dimension(&self) -> usize;

    /// Generate embeddings for multiple texts, in input order
    async fn embed_batch(&self, texts: &[String]) -> WordsResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> WordsResult<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WordsError::Embedding("No embedding returned".to_string()))
    }
}
