//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging when you only want the REST
//! surface (with OpenAPI/Swagger UI). The workspace's main `voyamed-run`
//! binary is the deployment entry point.

use api_rest::{router, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voyamed_core::CoreConfig;
use voyamed_store::HttpBackend;

/// Main entry point for the Voyamed REST API server.
///
/// # Environment Variables
/// - `VOYAMED_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `VOYAMED_STORE_URL`: Base URL of the hosted table store
/// - `VOYAMED_STORE_KEY`: API key for the hosted table store
/// - `VOYAMED_ADMIN_API_KEY`: Key required for catalog mutations
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the store configuration is missing or invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("VOYAMED_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let store_url = std::env::var("VOYAMED_STORE_URL")
        .map_err(|_| anyhow::anyhow!("VOYAMED_STORE_URL must be set"))?;
    let store_key = std::env::var("VOYAMED_STORE_KEY")
        .map_err(|_| anyhow::anyhow!("VOYAMED_STORE_KEY must be set"))?;
    let admin_api_key =
        std::env::var("VOYAMED_ADMIN_API_KEY").unwrap_or_else(|_| "dev-admin-key".into());

    tracing::info!("-- Starting Voyamed REST API on {}", addr);

    let cfg = CoreConfig::new(store_url, store_key)?;
    let backend = Arc::new(HttpBackend::new(cfg.store_base_url(), cfg.store_api_key())?);
    let state = AppState::new(backend, admin_api_key);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
