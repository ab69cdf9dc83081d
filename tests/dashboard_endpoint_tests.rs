//! Dashboard and analytics endpoint integration tests

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

mod common;
use common::*;

use fleetdash::models::{fuel, maintenance, panne, reparation, trip};

async fn insert_fuel(
    db: &DatabaseConnection,
    vehicle_id: i32,
    fuel_type_id: i32,
    cost: f64,
    created_at: chrono::DateTime<Utc>,
) {
    fuel::ActiveModel {
        vehicle_id: Set(vehicle_id),
        fuel_type_id: Set(fuel_type_id),
        quantity: Set(cost),
        price_per_liter: Set(1.0),
        cost: Set(cost),
        created_at: Set(created_at),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
}

async fn insert_trip(
    db: &DatabaseConnection,
    vehicle_id: i32,
    driver_id: i32,
    status: &str,
    start: chrono::DateTime<Utc>,
    end: Option<chrono::DateTime<Utc>>,
) {
    trip::ActiveModel {
        vehicle_id: Set(vehicle_id),
        driver_id: Set(driver_id),
        start_location: Set("HQ".to_string()),
        end_location: Set("Depot".to_string()),
        start_time: Set(start),
        end_time: Set(end),
        purpose: Set(Some("rounds".to_string())),
        notes: Set(None),
        status: Set(status.to_string()),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
}

#[tokio::test]
async fn test_kpis_reflect_seeded_data() {
    let db = create_test_db().await;
    create_test_user(&db, "USR0071", "u71@fleet.test", "user", None).await;
    let vehicle = create_vehicle(&db, "CE-071-AA", "VIN071").await;
    create_vehicle(&db, "CE-071-BB", "VIN071B").await;
    let driver = create_driver(&db, "DRV0071").await;
    let diesel = create_fuel_type(&db, "diesel").await;

    let now = Utc::now();
    insert_trip(&db, vehicle.id, driver.id, "planned", now + Duration::days(1), None).await;
    insert_fuel(&db, vehicle.id, diesel.id, 42.5, now).await;

    let app = build_test_app(db).await;
    let token = login(&app, "u71@fleet.test", TEST_PASSWORD).await;

    let (status, body) = authed_get(&app, "/api/v1/dashboard/kpis", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_vehicles"], 2);
    assert_eq!(body["planned_trips"], 1);
    assert_eq!(body["fuel_cost_this_week"], 42.5);
}

#[tokio::test]
async fn test_vehicle_status_chart_groups_by_status() {
    let db = create_test_db().await;
    create_test_user(&db, "USR0072", "u72@fleet.test", "user", None).await;
    create_vehicle(&db, "CE-072-AA", "VIN072").await;
    create_vehicle(&db, "CE-072-BB", "VIN072B").await;
    let in_repair = create_vehicle(&db, "CE-072-CC", "VIN072C").await;
    {
        use fleetdash::models::vehicle;
        let mut model: vehicle::ActiveModel = in_repair.into();
        model.status = Set("in_repair".to_string());
        model.update(&db).await.unwrap();
    }

    let app = build_test_app(db).await;
    let token = login(&app, "u72@fleet.test", TEST_PASSWORD).await;

    let (status, body) = authed_get(&app, "/api/v1/dashboard/charts/vehicle-status", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["labels"], serde_json::json!(["Available", "In Repair"]));
    assert_eq!(body["counts"], serde_json::json!([2, 1]));
}

#[tokio::test]
async fn test_monthly_activity_shape() {
    let db = create_test_db().await;
    create_test_user(&db, "USR0073", "u73@fleet.test", "user", None).await;
    let app = build_test_app(db).await;
    let token = login(&app, "u73@fleet.test", TEST_PASSWORD).await;

    let (status, body) = authed_get(
        &app,
        "/api/v1/dashboard/charts/monthly-activity?months_to_display=6",
        &token,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["labels"].as_array().unwrap().len(), 6);
    assert_eq!(body["trips"].as_array().unwrap().len(), 6);
    assert_eq!(body["maintenances"].as_array().unwrap().len(), 6);
    assert_eq!(body["pannes"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_top_drivers_counts_recent_completed_trips() {
    let db = create_test_db().await;
    create_test_user(&db, "USR0074", "u74@fleet.test", "user", None).await;
    let vehicle = create_vehicle(&db, "CE-074-AA", "VIN074").await;
    let busy = create_driver(&db, "DRV0074A").await;
    let idle = create_driver(&db, "DRV0074B").await;

    let now = Utc::now();
    for i in 0..3 {
        insert_trip(
            &db,
            vehicle.id,
            busy.id,
            "completed",
            now - Duration::days(10 + i),
            Some(now - Duration::days(9 + i)),
        )
        .await;
    }
    // Too old to count.
    insert_trip(
        &db,
        vehicle.id,
        idle.id,
        "completed",
        now - Duration::days(90),
        Some(now - Duration::days(89)),
    )
    .await;

    let app = build_test_app(db).await;
    let token = login(&app, "u74@fleet.test", TEST_PASSWORD).await;

    let (status, body) = authed_get(&app, "/api/v1/dashboard/top-performing-drivers", &token).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["driver_id"].as_i64().unwrap() as i32, busy.id);
    assert_eq!(items[0]["completed_trips"], 3);
}

#[tokio::test]
async fn test_alerts_and_recent_pannes() {
    let db = create_test_db().await;
    create_test_user(&db, "USR0075", "u75@fleet.test", "user", None).await;
    create_test_user(&db, "ADM0075", "admin75@fleet.test", "admin", None).await;
    let vehicle = create_vehicle(&db, "CE-075-AA", "VIN075").await;
    let app = build_test_app(db.clone()).await;

    // Report a breakdown through the API.
    let admin_token = login(&app, "admin75@fleet.test", TEST_PASSWORD).await;
    let (status, category) = authed_post(
        &app,
        "/api/v1/panne-categories",
        &admin_token,
        r#"{"name": "Engine"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let user_token = login(&app, "u75@fleet.test", TEST_PASSWORD).await;
    let (status, _) = authed_post(
        &app,
        "/api/v1/pannes",
        &user_token,
        &serde_json::json!({
            "vehicle_id": vehicle.id,
            "category_id": category["id"],
            "description": "won't start",
            "panne_date": Utc::now().to_rfc3339()
        })
        .to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = authed_get(&app, "/api/v1/dashboard/alerts", &user_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["critical_panne"]["plate_number"], "CE-075-AA");
    assert_eq!(body["critical_panne"]["message"], "Engine");
    assert_eq!(body["total_alerts"], 1);

    let (status, body) = authed_get(&app, "/api/v1/dashboard/recent-pannes", &user_token).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["category"], "Engine");
}

#[tokio::test]
async fn test_expense_summary_totals_and_breakdown() {
    let db = create_test_db().await;
    create_test_user(&db, "USR0076", "u76@fleet.test", "user", None).await;
    let vehicle = create_vehicle(&db, "CE-076-AA", "VIN076").await;
    let diesel = create_fuel_type(&db, "diesel").await;

    let jan = "2026-01-15T12:00:00Z".parse().unwrap();
    let feb = "2026-02-15T12:00:00Z".parse().unwrap();
    insert_fuel(&db, vehicle.id, diesel.id, 100.0, jan).await;
    insert_fuel(&db, vehicle.id, diesel.id, 50.0, feb).await;

    maintenance::ActiveModel {
        category_id: Set(None),
        vehicle_id: Set(vehicle.id),
        garage_id: Set(None),
        cost: Set(200.0),
        receipt: Set("R-1".to_string()),
        maintenance_date: Set(jan),
        created_at: Set(Utc::now()),
        status: Set("active".to_string()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let app = build_test_app(db).await;
    let token = login(&app, "u76@fleet.test", TEST_PASSWORD).await;

    let (status, body) = authed_get(
        &app,
        "/api/v1/analytics/expense-summary?start_date=2026-01-01&end_date=2026-03-31",
        &token,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_fuel_cost"], 150.0);
    assert_eq!(body["total_maintenance_cost"], 200.0);
    assert_eq!(body["total_reparation_cost"], 0.0);

    let breakdown = body["monthly_breakdown"].as_array().unwrap();
    assert_eq!(breakdown.len(), 3);
    assert_eq!(breakdown[0]["month"], "Jan '26");
    assert_eq!(breakdown[0]["fuel_cost"], 100.0);
    assert_eq!(breakdown[0]["maintenance_cost"], 200.0);
    assert_eq!(breakdown[1]["fuel_cost"], 50.0);
    assert_eq!(breakdown[2]["fuel_cost"], 0.0);
}

#[tokio::test]
async fn test_detailed_records_respect_category_filter() {
    let db = create_test_db().await;
    create_test_user(&db, "USR0077", "u77@fleet.test", "user", None).await;
    let vehicle = create_vehicle(&db, "CE-077-AA", "VIN077").await;
    let diesel = create_fuel_type(&db, "diesel").await;

    let jan = "2026-01-10T12:00:00Z".parse().unwrap();
    insert_fuel(&db, vehicle.id, diesel.id, 75.0, jan).await;

    let category = {
        use fleetdash::models::category_panne;
        category_panne::ActiveModel {
            name: Set("Brakes".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap()
    };
    let broken = panne::ActiveModel {
        vehicle_id: Set(vehicle.id),
        category_id: Set(category.id),
        description: Set(None),
        status: Set("active".to_string()),
        panne_date: Set(jan),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();
    reparation::ActiveModel {
        panne_id: Set(broken.id),
        cost: Set(120.0),
        receipt: Set("R-2".to_string()),
        garage_id: Set(None),
        repair_date: Set(jan),
        status: Set("completed".to_string()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let app = build_test_app(db).await;
    let token = login(&app, "u77@fleet.test", TEST_PASSWORD).await;

    // Unfiltered: every category is populated.
    let (status, body) = authed_get(
        &app,
        "/api/v1/analytics/detailed-expense-records?start_date=2026-01-01&end_date=2026-01-31",
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fuel_records"].as_array().unwrap().len(), 1);
    assert_eq!(body["reparation_records"].as_array().unwrap().len(), 1);

    // Filtered to fuel only.
    let (status, body) = authed_get(
        &app,
        "/api/v1/analytics/detailed-expense-records?start_date=2026-01-01&end_date=2026-01-31&categories=fuel",
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fuel_records"].as_array().unwrap().len(), 1);
    assert!(body["reparation_records"].as_array().unwrap().is_empty());

    // Reversed range is a bad request.
    let (status, _) = authed_get(
        &app,
        "/api/v1/analytics/expense-summary?start_date=2026-02-01&end_date=2026-01-01",
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
