//! olivemind-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints over
//! the configured store backend.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use olivemind_gateway::api;
use olivemind_gateway::app_state::AppState;
use olivemind_gateway::config::{GatewayConfig, StorageBackend};
use olivemind_gateway::domain::ChangeFeed;
use olivemind_gateway::service::EventCoordinator;
use olivemind_gateway::store::{MemoryStore, PgStore, WorkStore};
use olivemind_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting olivemind-gateway");

    // Select the store backend
    let store: Arc<dyn WorkStore> = match config.storage_backend {
        StorageBackend::Memory => {
            tracing::info!("using in-process store");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::Postgres => {
            tracing::info!("connecting to postgres store");
            Arc::new(PgStore::connect(&config).await?)
        }
    };

    // Build domain and service layers
    let change_feed = ChangeFeed::new(config.change_feed_capacity);
    let coordinator = Arc::new(EventCoordinator::new(store, change_feed.clone()));

    // Build application state
    let app_state = AppState {
        coordinator,
        change_feed,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
