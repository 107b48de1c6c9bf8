use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::ErrorDetail;

/// Fallback handler for unknown routes.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorDetail::new("Not Found"))).into_response()
}
