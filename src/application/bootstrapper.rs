//! Application bootstrapper
//!
//! Handles all initialization and setup for the FleetDash backend.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db;
use crate::endpoints;
use crate::state::AppState;

/// Bootstrap and run the application
pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(&config);

    tracing::info!("Starting FleetDash backend v{}", config.version);

    let conn = db::connect_with_url(&config.database.database_url).await?;
    let state = AppState::new(conn, config);

    let addr = SocketAddr::new(state.config.server.host.parse()?, state.config.server.port);
    let app = create_app(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(config: &Config) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("fleetdash={}", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_ansi(false))
        .init();
}

/// Create the main application router
fn create_app(state: AppState) -> Router {
    let cors = if state.config.server.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    endpoints::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
