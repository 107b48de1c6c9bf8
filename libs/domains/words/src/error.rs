use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WordsError {
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Vector store error: {0}")]
    Store(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type WordsResult<T> = Result<T, WordsError>;

impl From<qdrant_client::QdrantError> for WordsError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        WordsError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for WordsError {
    fn from(err: serde_json::Error) -> Self {
        WordsError::Internal(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for WordsError {
    fn from(err: std::io::Error) -> Self {
        WordsError::Store(format!("I/O error: {}", err))
    }
}

/// Convert WordsError to AppError for standardized HTTP error responses
impl From<WordsError> for AppError {
    fn from(err: WordsError) -> Self {
        match err {
            WordsError::Validation(msg) => AppError::BadRequest(msg),
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

impl IntoResponse for WordsError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let app_error: AppError =
            WordsError::Validation("user_word must not be blank".to_string()).into();
        assert_eq!(app_error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(app_error.to_string(), "user_word must not be blank");
    }

    #[test]
    fn test_failures_map_to_internal_error_with_message() {
        let app_error: AppError = WordsError::Embedding("timeout".to_string()).into();
        assert_eq!(app_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app_error.to_string(), "Embedding error: timeout");

        let app_error: AppError =
            WordsError::CollectionNotFound("words_collection".to_string()).into();
        assert_eq!(app_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_into_response_status() {
        let response = WordsError::Store("unavailable".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = WordsError::DimensionMismatch {
            expected: 384,
            actual: 1536,
        };
        assert_eq!(
            err.to_string(),
            "Vector dimension mismatch: expected 384, got 1536"
        );
    }
}
