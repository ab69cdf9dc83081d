//! Test helpers and utilities for integration testing.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set};
use sea_orm_migration::MigratorTrait;
use tower::util::ServiceExt;

use fleetdash::config::approvals::ApprovalConfig;
use fleetdash::config::auth::AuthConfig;
use fleetdash::config::database::DatabaseConfig;
use fleetdash::config::server::ServerConfig;
use fleetdash::config::Config;
use fleetdash::endpoints::create_router;
use fleetdash::migrations::Migrator;
use fleetdash::models::prelude::*;
use fleetdash::models::vehicle_request::RequestStatus;
use fleetdash::models::{driver, fuel_type, role, service, user, vehicle, vehicle_request};
use fleetdash::services::hash_password;
use fleetdash::state::AppState;

pub const TEST_PASSWORD: &str = "password123";

/// Create an in-memory SQLite database for testing
///
/// Runs the full migration chain, which also seeds the role table.
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

/// Configuration used by integration tests
pub fn test_config(enforce_step_order: bool) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            allowed_origins: Vec::new(),
        },
        database: DatabaseConfig {
            database_url: "sqlite::memory:".to_string(),
        },
        auth: AuthConfig {
            secret_key: "integration-test-secret".to_string(),
            access_token_expire_minutes: 60,
        },
        approvals: ApprovalConfig { enforce_step_order },
        version: env!("CARGO_PKG_VERSION").to_string(),
        log_level: "info".to_string(),
    }
}

/// Build the full application router over the given database
pub async fn build_test_app(db: DatabaseConnection) -> Router {
    create_router(AppState::new(db, test_config(false)))
}

/// Build the router with the strict step-ordering policy enabled
pub async fn build_strict_test_app(db: DatabaseConnection) -> Router {
    create_router(AppState::new(db, test_config(true)))
}

/// Create an active test user with the given role
pub async fn create_test_user(
    db: &DatabaseConnection,
    matricule: &str,
    email: &str,
    role_name: &str,
    service_id: Option<i32>,
) -> user::Model {
    let role = Role::find()
        .filter(role::Column::Name.eq(role_name))
        .one(db)
        .await
        .unwrap()
        .expect("Role not found");

    let new_user = user::ActiveModel {
        matricule: Set(matricule.to_string()),
        first_name: Set("Test".to_string()),
        last_name: Set(matricule.to_string()),
        telephone: Set(format!("+237-{}", matricule)),
        service_id: Set(service_id),
        email: Set(email.to_string()),
        hashed_password: Set(hash_password(TEST_PASSWORD).unwrap()),
        role_id: Set(role.id),
        status: Set("active".to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    new_user.insert(db).await.unwrap()
}

/// Create a department
pub async fn create_service(db: &DatabaseConnection, name: &str) -> service::Model {
    let new_service = service::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    };
    new_service.insert(db).await.unwrap()
}

/// Create a pending vehicle request owned by the given user
pub async fn create_request(db: &DatabaseConnection, requester_id: i32) -> vehicle_request::Model {
    let now = chrono::Utc::now();

    let new_request = vehicle_request::ActiveModel {
        purpose: Set("Site visit".to_string()),
        from_location: Set("HQ".to_string()),
        to_location: Set("North depot".to_string()),
        roadmap: Set(None),
        departure_time: Set(now + chrono::Duration::days(1)),
        return_time: Set(now + chrono::Duration::days(2)),
        status: Set(RequestStatus::Pending),
        created_at: Set(now),
        requester_id: Set(Some(requester_id)),
        vehicle_id: Set(None),
        driver_id: Set(None),
        ..Default::default()
    };

    new_request.insert(db).await.unwrap()
}

/// Create a vehicle with the given plate and VIN
pub async fn create_vehicle(db: &DatabaseConnection, plate: &str, vin: &str) -> vehicle::Model {
    let new_vehicle = vehicle::ActiveModel {
        make_id: Set(None),
        model_id: Set(None),
        year: Set(Some(2021)),
        plate_number: Set(plate.to_string()),
        mileage: Set(12_000.0),
        engine_size: Set(2.0),
        vehicle_type_id: Set(None),
        transmission_id: Set(None),
        fuel_type_id: Set(None),
        vin: Set(vin.to_string()),
        color: Set("white".to_string()),
        purchase_price: Set(0.0),
        purchase_date: Set(None),
        status: Set("available".to_string()),
        registration_date: Set(chrono::Utc::now()),
        ..Default::default()
    };

    new_vehicle.insert(db).await.unwrap()
}

/// Create a driver roster entry
pub async fn create_driver(db: &DatabaseConnection, matricule: &str) -> driver::Model {
    let new_driver = driver::ActiveModel {
        first_name: Set("Driver".to_string()),
        last_name: Set(matricule.to_string()),
        cni_number: Set(format!("CNI-{}", matricule)),
        email: Set(format!("{}@fleet.test", matricule.to_lowercase())),
        matricule: Set(matricule.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    new_driver.insert(db).await.unwrap()
}

/// Create a fuel type
pub async fn create_fuel_type(db: &DatabaseConnection, name: &str) -> fuel_type::Model {
    let new_fuel_type = fuel_type::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    };
    new_fuel_type.insert(db).await.unwrap()
}

// ============================================================================
// HTTP helpers
// ============================================================================

/// POST /api/v1/auth/login and return the access token.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let body = serde_json::json!({
        "username": username,
        "password": password
    })
    .to_string();

    let request = Request::builder()
        .uri("/api/v1/auth/login")
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "login failed");

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    parsed["access_token"].as_str().unwrap().to_string()
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    json_body: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match json_body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, value)
}

pub async fn authed_get(app: &Router, uri: &str, token: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, Some(token), None).await
}

pub async fn authed_post(
    app: &Router,
    uri: &str,
    token: &str,
    json_body: &str,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(token), Some(json_body)).await
}

pub async fn authed_put(
    app: &Router,
    uri: &str,
    token: &str,
    json_body: &str,
) -> (StatusCode, serde_json::Value) {
    send(app, "PUT", uri, Some(token), Some(json_body)).await
}

pub async fn authed_patch(
    app: &Router,
    uri: &str,
    token: &str,
    json_body: &str,
) -> (StatusCode, serde_json::Value) {
    send(app, "PATCH", uri, Some(token), Some(json_body)).await
}

pub async fn authed_delete(app: &Router, uri: &str, token: &str) -> (StatusCode, serde_json::Value) {
    send(app, "DELETE", uri, Some(token), None).await
}

pub async fn anon_get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None, None).await
}

pub async fn anon_post(app: &Router, uri: &str, json_body: &str) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, None, Some(json_body)).await
}
