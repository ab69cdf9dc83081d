//! Test helpers and utilities for unit testing.
//!
//! Integration tests carry their own copy of these helpers in
//! `tests/common/mod.rs`.

#![allow(dead_code)]

use sea_orm::{ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set};
use sea_orm_migration::MigratorTrait;

use crate::migrations::Migrator;
use crate::models::prelude::*;
use crate::models::vehicle_request::RequestStatus;
use crate::models::{role, service, user, vehicle, vehicle_request};
use crate::services::security::hash_password;

/// Create an in-memory SQLite database for testing
///
/// Runs the full migration chain, which also seeds the role table.
pub async fn create_test_db() -> DatabaseConnection {
    // Use simple in-memory SQLite - each connection gets its own database
    let db_url = "sqlite::memory:";

    let db = Database::connect(db_url)
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
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

    let hashed = hash_password("password123").unwrap();
    let now = chrono::Utc::now();

    let new_user = user::ActiveModel {
        matricule: Set(matricule.to_string()),
        first_name: Set("Test".to_string()),
        last_name: Set(matricule.to_string()),
        telephone: Set(format!("+237-{}", matricule)),
        service_id: Set(service_id),
        email: Set(email.to_string()),
        hashed_password: Set(hashed),
        role_id: Set(role.id),
        status: Set("active".to_string()),
        created_at: Set(now),
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
    let now = chrono::Utc::now();

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
        registration_date: Set(now),
        ..Default::default()
    };

    new_vehicle.insert(db).await.unwrap()
}
