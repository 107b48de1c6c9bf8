use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    self, CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};

use super::VectorStore;
use crate::error::{WordsError, WordsResult};
use crate::models::{
    CollectionInfo, ScoredPoint, VectorParams, VectorPoint, WordPayload,
};

const WORD_PAYLOAD_KEY: &str = "word";

/// Qdrant connection configuration
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl QdrantConfig {
    pub fn new(url: String) -> Self {
        Self {
            url,
            api_key: None,
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

/// Remote Qdrant server accessed over gRPC
pub struct QdrantStore {
    client: Qdrant,
}

impl QdrantStore {
    pub fn new(config: QdrantConfig) -> WordsResult<Self> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(api_key) = config.api_key {
            builder = builder.api_key(api_key);
        }

        builder = builder.timeout(Duration::from_secs(config.timeout_secs));

        let client = builder
            .build()
            .map_err(|e| WordsError::Store(format!("Failed to build client: {}", e)))?;

        Ok(Self { client })
    }

    fn to_point_struct(point: VectorPoint) -> PointStruct {
        let mut payload = HashMap::new();
        payload.insert(
            WORD_PAYLOAD_KEY.to_string(),
            QdrantValue::from(point.payload.word),
        );
        PointStruct::new(point.id, point.vector, payload)
    }

    fn point_id_to_u64(point_id: Option<&qdrant::PointId>) -> WordsResult<u64> {
        match point_id.and_then(|p| p.point_id_options.as_ref()) {
            Some(qdrant::point_id::PointIdOptions::Num(num)) => Ok(*num),
            Some(qdrant::point_id::PointIdOptions::Uuid(uuid)) => Err(WordsError::Internal(
                format!("Unexpected UUID point id: {}", uuid),
            )),
            None => Err(WordsError::Internal("Missing point ID".to_string())),
        }
    }

    fn word_from_payload(payload: &HashMap<String, QdrantValue>) -> Option<WordPayload> {
        use qdrant::value::Kind;

        match payload.get(WORD_PAYLOAD_KEY).and_then(|v| v.kind.as_ref()) {
            Some(Kind::StringValue(word)) => Some(WordPayload::new(word.clone())),
            _ => None,
        }
    }

    /// Configured size of the collection's single unnamed vector, if any
    fn vector_size(config: &Option<qdrant::CollectionConfig>) -> Option<usize> {
        let vectors_config = config.as_ref()?.params.as_ref()?.vectors_config.as_ref()?;
        match vectors_config.config.as_ref()? {
            qdrant::vectors_config::Config::Params(p) => Some(p.size as usize),
            qdrant::vectors_config::Config::ParamsMap(map) => {
                map.map.values().next().map(|p| p.size as usize)
            }
        }
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn list_collections(&self) -> WordsResult<Vec<String>> {
        let response = self.client.list_collections().await?;
        Ok(response.collections.into_iter().map(|c| c.name).collect())
    }

    async fn create_collection(&self, name: &str, params: VectorParams) -> WordsResult<()> {
        let builder = CreateCollectionBuilder::new(name).vectors_config(VectorParamsBuilder::new(
            params.size as u64,
            Distance::Cosine,
        ));

        self.client.create_collection(builder).await?;
        Ok(())
    }

    async fn collection_info(&self, name: &str) -> WordsResult<CollectionInfo> {
        if !self.client.collection_exists(name).await? {
            return Err(WordsError::CollectionNotFound(name.to_string()));
        }

        let info = self.client.collection_info(name).await?;
        let result = info
            .result
            .ok_or_else(|| WordsError::Internal("Collection info missing result".to_string()))?;

        Ok(CollectionInfo {
            name: name.to_string(),
            points_count: result.points_count.unwrap_or(0),
            vectors_count: result.indexed_vectors_count,
            vector_size: Self::vector_size(&result.config),
        })
    }

    async fn upsert(&self, name: &str, points: Vec<VectorPoint>) -> WordsResult<()> {
        let points: Vec<PointStruct> = points.into_iter().map(Self::to_point_struct).collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(name, points).wait(true))
            .await?;
        Ok(())
    }

    async fn query(
        &self,
        name: &str,
        vector: Vec<f32>,
        limit: usize,
    ) -> WordsResult<Vec<ScoredPoint>> {
        let builder = SearchPointsBuilder::new(name, vector, limit as u64).with_payload(true);

        let results = self.client.search_points(builder).await?;

        results
            .result
            .into_iter()
            .map(|point| {
                Ok(ScoredPoint {
                    id: Self::point_id_to_u64(point.id.as_ref())?,
                    score: point.score,
                    payload: Self::word_from_payload(&point.payload),
                })
            })
            .collect()
    }
}
