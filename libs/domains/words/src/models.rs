use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Vector parameters a collection is created with. Collections always use cosine distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VectorParams {
    pub size: usize,
}

impl VectorParams {
    pub fn cosine(size: usize) -> Self {
        Self { size }
    }
}

/// Payload stored alongside every vocabulary vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WordPayload {
    pub word: String,
}

impl WordPayload {
    pub fn new(word: impl Into<String>) -> Self {
        Self { word: word.into() }
    }
}

/// A vector record: id assigned by vocabulary position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorPoint {
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: WordPayload,
}

impl VectorPoint {
    pub fn new(id: u64, vector: Vec<f32>, word: impl Into<String>) -> Self {
        Self {
            id,
            vector,
            payload: WordPayload::new(word),
        }
    }
}

/// A ranked match returned by a nearest-neighbour query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPoint {
    pub id: u64,
    pub score: f32,
    pub payload: Option<WordPayload>,
}

/// Collection statistics as reported by the vector store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    pub points_count: u64,
    pub vectors_count: Option<u64>,
    /// Configured vector size, when the backend reports it
    pub vector_size: Option<usize>,
}

/// Body of `POST /search`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SearchRequest {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "puppy")]
    pub user_word: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("user_word must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// One annotated match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchResult {
    #[schema(example = "dog")]
    pub word: String,
    #[schema(example = "A puppy is a young dog.")]
    pub reason: String,
    /// Cosine similarity in `[0, 1]`, rounded to two decimals
    #[schema(example = 0.81)]
    pub score: f64,
}

/// Body of `GET /words`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WordsResponse {
    pub words: Vec<String>,
}

/// Body of `GET /db-status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DbStatus {
    Connected {
        collection: String,
        points_count: u64,
        vectors_count: Option<u64>,
    },
    Error {
        message: String,
    },
}
