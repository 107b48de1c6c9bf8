//! Server infrastructure module.
//!
//! This module provides:
//! - Router assembly with OpenAPI document, tracing and CORS
//! - The `/health` liveness endpoint
//! - Graceful shutdown on SIGINT/SIGTERM
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_app, create_router, health_router};
//! use core_config::{app_info, server::ServerConfig};
//!
//! let router = create_router::<ApiDoc>(api_routes).merge(health_router(app_info!()));
//! create_app(router, &ServerConfig::default()).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_app, create_router};
pub use health::{HealthResponse, health_router};
pub use shutdown::shutdown_signal;
