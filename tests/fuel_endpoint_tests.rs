//! Fuel records endpoint integration tests

use axum::http::StatusCode;
use sea_orm::{ActiveModelTrait, Set};

mod common;
use common::*;

use fleetdash::models::trip;

#[tokio::test]
async fn test_create_fuel_record_computes_cost() {
    let db = create_test_db().await;
    create_test_user(&db, "USR0031", "u31@fleet.test", "user", None).await;
    let vehicle = create_vehicle(&db, "CE-031-AA", "VIN031").await;
    let diesel = create_fuel_type(&db, "diesel").await;
    let app = build_test_app(db).await;

    let token = login(&app, "u31@fleet.test", TEST_PASSWORD).await;
    let (status, body) = authed_post(
        &app,
        "/api/v1/fuel",
        &token,
        &serde_json::json!({
            "vehicle_id": vehicle.id,
            "fuel_type_id": diesel.id,
            "quantity": 40.0,
            "price_per_liter": 1.25
        })
        .to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["cost"], 50.0);
}

#[tokio::test]
async fn test_non_positive_quantity_is_rejected() {
    let db = create_test_db().await;
    create_test_user(&db, "USR0032", "u32@fleet.test", "user", None).await;
    let vehicle = create_vehicle(&db, "CE-032-AA", "VIN032").await;
    let diesel = create_fuel_type(&db, "diesel").await;
    let app = build_test_app(db).await;

    let token = login(&app, "u32@fleet.test", TEST_PASSWORD).await;
    let (status, _) = authed_post(
        &app,
        "/api/v1/fuel",
        &token,
        &serde_json::json!({
            "vehicle_id": vehicle.id,
            "fuel_type_id": diesel.id,
            "quantity": 0.0,
            "price_per_liter": 1.25
        })
        .to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = authed_post(
        &app,
        "/api/v1/fuel",
        &token,
        &serde_json::json!({
            "vehicle_id": vehicle.id,
            "fuel_type_id": diesel.id,
            "quantity": 10.0,
            "price_per_liter": -1.0
        })
        .to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_vehicle_or_fuel_type_is_not_found() {
    let db = create_test_db().await;
    create_test_user(&db, "USR0033", "u33@fleet.test", "user", None).await;
    let vehicle = create_vehicle(&db, "CE-033-AA", "VIN033").await;
    let app = build_test_app(db).await;

    let token = login(&app, "u33@fleet.test", TEST_PASSWORD).await;
    let (status, _) = authed_post(
        &app,
        "/api/v1/fuel",
        &token,
        &serde_json::json!({
            "vehicle_id": 9999,
            "fuel_type_id": 1,
            "quantity": 10.0,
            "price_per_liter": 1.0
        })
        .to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = authed_post(
        &app,
        "/api/v1/fuel",
        &token,
        &serde_json::json!({
            "vehicle_id": vehicle.id,
            "fuel_type_id": 9999,
            "quantity": 10.0,
            "price_per_liter": 1.0
        })
        .to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_recalculates_cost_and_requires_admin() {
    let db = create_test_db().await;
    create_test_user(&db, "USR0034", "u34@fleet.test", "user", None).await;
    create_test_user(&db, "ADM0034", "admin34@fleet.test", "admin", None).await;
    let vehicle = create_vehicle(&db, "CE-034-AA", "VIN034").await;
    let diesel = create_fuel_type(&db, "diesel").await;
    let app = build_test_app(db).await;

    let user_token = login(&app, "u34@fleet.test", TEST_PASSWORD).await;
    let (_, created) = authed_post(
        &app,
        "/api/v1/fuel",
        &user_token,
        &serde_json::json!({
            "vehicle_id": vehicle.id,
            "fuel_type_id": diesel.id,
            "quantity": 20.0,
            "price_per_liter": 2.0
        })
        .to_string(),
    )
    .await;
    let fuel_id = created["id"].as_i64().unwrap();

    // Updates are an admin action.
    let (status, _) = authed_put(
        &app,
        &format!("/api/v1/fuel/{}", fuel_id),
        &user_token,
        r#"{"quantity": 30.0}"#,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin_token = login(&app, "admin34@fleet.test", TEST_PASSWORD).await;
    let (status, body) = authed_put(
        &app,
        &format!("/api/v1/fuel/{}", fuel_id),
        &admin_token,
        r#"{"quantity": 30.0}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cost"], 60.0);
}

#[tokio::test]
async fn test_eligibility_rules() {
    let db = create_test_db().await;
    create_test_user(&db, "USR0035", "u35@fleet.test", "user", None).await;
    let vehicle = create_vehicle(&db, "CE-035-AA", "VIN035").await;
    let in_repair = create_vehicle(&db, "CE-035-BB", "VIN035B").await;
    let diesel = create_fuel_type(&db, "diesel").await;
    let roster_driver = create_driver(&db, "DRV0035").await;

    // Mark the second vehicle unavailable.
    {
        use fleetdash::models::vehicle;
        let mut model: vehicle::ActiveModel = in_repair.clone().into();
        model.status = Set("in_repair".to_string());
        model.update(&db).await.unwrap();
    }

    let app = build_test_app(db.clone()).await;
    let token = login(&app, "u35@fleet.test", TEST_PASSWORD).await;

    // Never fueled: eligible.
    let (status, body) = authed_get(
        &app,
        &format!("/api/v1/fuel/check-eligibility/{}", vehicle.id),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eligible"], true);

    // Unavailable vehicle: not eligible.
    let (status, body) = authed_get(
        &app,
        &format!("/api/v1/fuel/check-eligibility/{}", in_repair.id),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eligible"], false);

    // After a refueling with no completed trip since: not eligible.
    authed_post(
        &app,
        "/api/v1/fuel",
        &token,
        &serde_json::json!({
            "vehicle_id": vehicle.id,
            "fuel_type_id": diesel.id,
            "quantity": 10.0,
            "price_per_liter": 1.0
        })
        .to_string(),
    )
    .await;

    let (status, body) = authed_get(
        &app,
        &format!("/api/v1/fuel/check-eligibility/{}", vehicle.id),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eligible"], false);
    assert!(body["message"].as_str().unwrap().contains("completed trip"));

    // A completed trip after the refueling restores eligibility.
    let now = chrono::Utc::now();
    let completed_trip = trip::ActiveModel {
        vehicle_id: Set(vehicle.id),
        driver_id: Set(roster_driver.id),
        start_location: Set("HQ".to_string()),
        end_location: Set("Depot".to_string()),
        start_time: Set(now + chrono::Duration::minutes(5)),
        end_time: Set(Some(now + chrono::Duration::hours(2))),
        purpose: Set(None),
        notes: Set(None),
        status: Set("completed".to_string()),
        created_at: Set(now),
        updated_at: Set(None),
        ..Default::default()
    };
    completed_trip.insert(&db).await.unwrap();

    let (status, body) = authed_get(
        &app,
        &format!("/api/v1/fuel/check-eligibility/{}", vehicle.id),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eligible"], true);
}

#[tokio::test]
async fn test_list_filters_by_vehicle() {
    let db = create_test_db().await;
    create_test_user(&db, "USR0036", "u36@fleet.test", "user", None).await;
    let first = create_vehicle(&db, "CE-036-AA", "VIN036").await;
    let second = create_vehicle(&db, "CE-036-BB", "VIN036B").await;
    let diesel = create_fuel_type(&db, "diesel").await;
    let app = build_test_app(db).await;

    let token = login(&app, "u36@fleet.test", TEST_PASSWORD).await;
    for vehicle_id in [first.id, first.id, second.id] {
        authed_post(
            &app,
            "/api/v1/fuel",
            &token,
            &serde_json::json!({
                "vehicle_id": vehicle_id,
                "fuel_type_id": diesel.id,
                "quantity": 10.0,
                "price_per_liter": 1.0
            })
            .to_string(),
        )
        .await;
    }

    let (status, body) = authed_get(&app, &format!("/api/v1/fuel?vehicle_id={}", first.id), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}
