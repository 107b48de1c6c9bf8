//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`server`]**: Router assembly, `/health`, graceful shutdown
//! - **[`http`]**: HTTP middleware (CORS)
//! - **[`errors`]**: `{"detail": ...}` error responses
//! - **[`extractors`]**: Validated JSON bodies
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_app, create_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let router = create_router::<ApiDoc>(Router::new());
//!     create_app(router, &ServerConfig::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

// Re-export server types
pub use server::{HealthResponse, create_app, create_router, health_router, shutdown_signal};

// Re-export HTTP middleware
pub use http::create_permissive_cors_layer;

// Re-export error types
pub use errors::{AppError, ErrorDetail};

// Re-export extractors
pub use extractors::ValidatedJson;
