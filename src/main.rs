use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use voyamed_core::CoreConfig;
use voyamed_store::HttpBackend;

/// Main entry point for the Voyamed application.
///
/// Starts the REST server that fronts the hosted table store: catalog
/// CRUD, bookings, free-text search, and the patient journey tracker.
///
/// # Environment Variables
/// - `VOYAMED_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `VOYAMED_STORE_URL`: Base URL of the hosted table store
/// - `VOYAMED_STORE_KEY`: API key for the hosted table store
/// - `VOYAMED_ADMIN_API_KEY`: Key required for catalog mutations
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("voyamed=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("VOYAMED_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let store_url = std::env::var("VOYAMED_STORE_URL")
        .map_err(|_| anyhow::anyhow!("VOYAMED_STORE_URL must be set"))?;
    let store_key = std::env::var("VOYAMED_STORE_KEY")
        .map_err(|_| anyhow::anyhow!("VOYAMED_STORE_KEY must be set"))?;
    let admin_api_key =
        std::env::var("VOYAMED_ADMIN_API_KEY").unwrap_or_else(|_| "dev-admin-key".into());

    tracing::info!("++ Starting Voyamed REST on {}", rest_addr);

    let cfg = CoreConfig::new(store_url, store_key)?;
    let backend = Arc::new(HttpBackend::new(cfg.store_base_url(), cfg.store_api_key())?);
    let state = AppState::new(backend, admin_api_key);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
