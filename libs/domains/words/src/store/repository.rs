use async_trait::async_trait;
use tracing::info;

use crate::error::WordsResult;
use crate::models::{CollectionInfo, ScoredPoint, VectorParams, VectorPoint};

/// Storage abstraction over the vector database
///
/// `query` returns matches ranked by descending similarity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn list_collections(&self) -> WordsResult<Vec<String>>;

    async fn create_collection(&self, name: &str, params: VectorParams) -> WordsResult<()>;

    /// Fails with `CollectionNotFound` when the collection does not exist
    async fn collection_info(&self, name: &str) -> WordsResult<CollectionInfo>;

    /// Insert or replace points by id
    async fn upsert(&self, name: &str, points: Vec<VectorPoint>) -> WordsResult<()>;

    async fn query(
        &self,
        name: &str,
        vector: Vec<f32>,
        limit: usize,
    ) -> WordsResult<Vec<ScoredPoint>>;
}

/// Creates the collection when absent. Returns `true` when it was created.
pub async fn ensure_collection(
    store: &dyn VectorStore,
    name: &str,
    params: VectorParams,
) -> WordsResult<bool> {
    let collections = store.list_collections().await?;
    if collections.iter().any(|c| c == name) {
        return Ok(false);
    }

    store.create_collection(name, params).await?;
    info!(collection = name, size = params.size, "Created collection");
    Ok(true)
}
