use axum::Router;
use axum_helpers::server::{create_app, create_router, health_router};
use core_config::load_dotenv;
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod config;
mod openapi;
mod state;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let dotenv = load_dotenv();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);
    if let Some(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    let state = state::build_state(&config).await?;
    let app = app(state, &config);

    info!("Starting wordlink API");

    create_app(app, &config.server)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Wordlink API shutdown complete");
    Ok(())
}

/// Full application router: words API, OpenAPI document and `/health`
fn app(state: domain_words::WordsState, config: &Config) -> Router {
    create_router::<openapi::ApiDoc>(domain_words::router(state)).merge(health_router(config.app))
}
