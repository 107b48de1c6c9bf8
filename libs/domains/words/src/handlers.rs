//! REST handlers for the word-association API

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{ErrorDetail, ValidatedJson};
use serde_json::json;
use utoipa::OpenApi;

use crate::bootstrap::BootstrapStatus;
use crate::error::WordsResult;
use crate::models::{DbStatus, SearchRequest, SearchResult, WordsResponse};
use crate::service::SearchService;

/// Shared handler state
#[derive(Clone)]
pub struct WordsState {
    pub service: Arc<SearchService>,
    pub bootstrap: BootstrapStatus,
}

impl WordsState {
    pub fn new(service: SearchService, bootstrap: BootstrapStatus) -> Self {
        Self {
            service: Arc::new(service),
            bootstrap,
        }
    }
}

/// OpenAPI documentation for the words API
#[derive(OpenApi)]
#[openapi(
    paths(list_words, db_status, search, ready),
    components(schemas(WordsResponse, DbStatus, SearchRequest, SearchResult, ErrorDetail)),
    tags(
        (name = "words", description = "Word association search")
    )
)]
pub struct WordsApiDoc;

/// Create router for the words API
pub fn router(state: WordsState) -> Router {
    Router::new()
        .route("/words", get(list_words))
        .route("/db-status", get(db_status))
        .route("/search", post(search))
        .route("/ready", get(ready))
        .with_state(state)
}

/// List the fixed vocabulary
#[utoipa::path(
    get,
    path = "/words",
    tag = "words",
    responses(
        (status = 200, description = "Vocabulary in list order", body = WordsResponse)
    )
)]
pub async fn list_words(State(state): State<WordsState>) -> Json<WordsResponse> {
    Json(WordsResponse {
        words: state.service.words().to_vec(),
    })
}

/// Vector store status; failures are reported in the body, never as an HTTP error
#[utoipa::path(
    get,
    path = "/db-status",
    tag = "words",
    responses(
        (status = 200, description = "Collection status or error message", body = DbStatus)
    )
)]
pub async fn db_status(State(state): State<WordsState>) -> Json<DbStatus> {
    Json(state.service.db_status().await)
}

/// Find vocabulary words related to `user_word`
#[utoipa::path(
    post,
    path = "/search",
    tag = "words",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Annotated matches, best first", body = Vec<SearchResult>),
        (status = 400, description = "Blank word", body = ErrorDetail),
        (status = 422, description = "Malformed body", body = ErrorDetail),
        (status = 500, description = "Embedding or vector store failure", body = ErrorDetail)
    )
)]
pub async fn search(
    State(state): State<WordsState>,
    ValidatedJson(request): ValidatedJson<SearchRequest>,
) -> WordsResult<Json<Vec<SearchResult>>> {
    let results = state.service.search(&request.user_word).await?;
    Ok(Json(results))
}

/// Readiness: 200 once the vocabulary bootstrap has succeeded
#[utoipa::path(
    get,
    path = "/ready",
    tag = "words",
    responses(
        (status = 200, description = "Bootstrap complete"),
        (status = 503, description = "Bootstrap pending or failed")
    )
)]
pub async fn ready(State(state): State<WordsState>) -> impl IntoResponse {
    let bootstrap = state.bootstrap.get().await;
    let status = if bootstrap.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "ready": bootstrap.is_ready(),
            "bootstrap": bootstrap,
        })),
    )
}
