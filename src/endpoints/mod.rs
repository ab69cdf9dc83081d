pub mod analytics;
pub mod approvals;
pub mod auth;
pub mod dashboard;
pub mod drivers;
pub mod fuel;
pub mod lookups;
pub mod maintenance;
pub mod pannes;
pub mod reparations;
pub mod requests;
pub mod roles;
pub mod trips;
pub mod users;
pub mod vehicles;

use axum::{middleware as axum_middleware, routing::get, Router};

use crate::middleware::require_auth;
use crate::state::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/v1/version", get(get_version))
        .nest("/api/v1/auth", auth::auth_routes(state.clone()));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .nest("/api/v1", api_routes(state.clone()))
        .layer(axum_middleware::from_fn_with_state(state, require_auth));

    // Merge public and protected routes
    public_routes.merge(protected_routes)
}

/// API routes under /api/v1/* (protected by auth middleware)
fn api_routes(state: AppState) -> Router {
    Router::new()
        .nest("/users", users::users_routes(state.clone()))
        .nest("/roles", roles::roles_routes(state.clone()))
        .nest("/drivers", drivers::drivers_routes(state.clone()))
        .nest("/vehicles", vehicles::vehicles_routes(state.clone()))
        .nest("/fuel", fuel::fuel_routes(state.clone()))
        .nest("/trips", trips::trips_routes(state.clone()))
        .nest("/maintenances", maintenance::maintenance_routes(state.clone()))
        .nest("/pannes", pannes::pannes_routes(state.clone()))
        .nest("/reparations", reparations::reparations_routes(state.clone()))
        .nest("/requests", requests::requests_routes(state.clone()))
        .nest("/approvals", approvals::approvals_routes(state.clone()))
        .nest("/dashboard", dashboard::dashboard_routes(state.clone()))
        .nest("/analytics", analytics::analytics_routes(state.clone()))
        .nest("/services", lookups::services::routes(state.clone()))
        .nest("/garages", lookups::garages::routes(state.clone()))
        .nest("/fuel-types", lookups::fuel_types::routes(state.clone()))
        .nest("/vehicle-makes", lookups::vehicle_makes::routes(state.clone()))
        .nest("/vehicle-models", lookups::vehicle_models::routes(state.clone()))
        .nest("/vehicle-types", lookups::vehicle_types::routes(state.clone()))
        .nest(
            "/vehicle-transmissions",
            lookups::vehicle_transmissions::routes(state.clone()),
        )
        .nest(
            "/maintenance-categories",
            lookups::maintenance_categories::routes(state.clone()),
        )
        .nest(
            "/panne-categories",
            lookups::panne_categories::routes(state),
        )
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Version info endpoint
async fn get_version() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "backend": "rust"
    }))
}
