//! Lookup table CRUD integration tests
//!
//! The nine lookup routers share one implementation; services and garages
//! stand in for the rest.

use axum::http::StatusCode;

mod common;
use common::*;

#[tokio::test]
async fn test_service_crud_and_conflict() {
    let db = create_test_db().await;
    create_test_user(&db, "ADM0061", "admin61@fleet.test", "admin", None).await;
    let app = build_test_app(db).await;

    let token = login(&app, "admin61@fleet.test", TEST_PASSWORD).await;

    let (status, created) = authed_post(
        &app,
        "/api/v1/services",
        &token,
        r#"{"name": "Logistics"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    // Duplicate name conflicts.
    let (status, body) = authed_post(
        &app,
        "/api/v1/services",
        &token,
        r#"{"name": "Logistics"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["detail"].as_str().unwrap().contains("already exists"));

    // Rename and delete.
    let (status, body) = authed_put(
        &app,
        &format!("/api/v1/services/{}", id),
        &token,
        r#"{"name": "Field Logistics"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Field Logistics");

    let (status, _) = authed_delete(&app, &format!("/api/v1/services/{}", id), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = authed_get(&app, &format!("/api/v1/services/{}", id), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_lookup_reads_open_to_users_mutations_admin_only() {
    let db = create_test_db().await;
    create_test_user(&db, "ADM0062", "admin62@fleet.test", "admin", None).await;
    create_test_user(&db, "USR0062", "u62@fleet.test", "user", None).await;
    let app = build_test_app(db).await;

    let admin_token = login(&app, "admin62@fleet.test", TEST_PASSWORD).await;
    let (status, _) = authed_post(
        &app,
        "/api/v1/garages",
        &admin_token,
        r#"{"name": "Central Garage"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let user_token = login(&app, "u62@fleet.test", TEST_PASSWORD).await;

    // Reads are fine for everyone logged in.
    let (status, body) = authed_get(&app, "/api/v1/garages", &user_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Mutations are not.
    let (status, _) = authed_post(
        &app,
        "/api/v1/garages",
        &user_token,
        r#"{"name": "Backyard"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_lookup_list_is_sorted_by_name() {
    let db = create_test_db().await;
    create_test_user(&db, "ADM0063", "admin63@fleet.test", "admin", None).await;
    let app = build_test_app(db).await;

    let token = login(&app, "admin63@fleet.test", TEST_PASSWORD).await;
    for name in ["petrol", "diesel", "electric"] {
        let (status, _) = authed_post(
            &app,
            "/api/v1/fuel-types",
            &token,
            &serde_json::json!({ "name": name }).to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = authed_get(&app, "/api/v1/fuel-types", &token).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["diesel", "electric", "petrol"]);
}
