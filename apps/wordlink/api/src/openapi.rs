use axum_helpers::HealthResponse;
use domain_words::WordsApiDoc;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wordlink API",
        version = "0.1.0",
        description = "Semantic word association over a fixed vocabulary"
    ),
    components(schemas(HealthResponse))
)]
struct ServiceDoc;

/// Main API documentation: service info plus the words routes, all mounted at the root
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        ServiceDoc::openapi().merge_from(WordsApiDoc::openapi())
    }
}
