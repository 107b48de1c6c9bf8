use tower_http::cors::{Any, CorsLayer};

/// Creates a CORS layer that allows every origin, method and header.
///
/// Credentials are not allowed, so the wildcard origin is valid for browsers.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
