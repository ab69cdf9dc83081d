//! Request listing, visibility and lifecycle integration tests
//!
//! Covers:
//! - `GET /api/v1/requests` — role-filtered listing
//! - `GET /api/v1/requests/my-requests` — caller's own requests
//! - `GET /api/v1/requests/{id}` — visibility rules
//! - `PUT /api/v1/requests/{id}/assign` — vehicle/driver assignment
//! - `DELETE /api/v1/requests/{id}` — owner/admin delete policy
//! - `GET /api/v1/requests/count/pending`

use axum::http::StatusCode;

mod common;
use common::*;

#[tokio::test]
async fn test_admin_sees_all_requests_newest_first() {
    let db = create_test_db().await;
    let alice = create_test_user(&db, "ALC0001", "alice@fleet.test", "user", None).await;
    let bob = create_test_user(&db, "BOB0001", "bob@fleet.test", "user", None).await;
    create_test_user(&db, "ADM0001", "admin@fleet.test", "admin", None).await;
    create_request(&db, alice.id).await;
    create_request(&db, bob.id).await;
    let app = build_test_app(db).await;

    let token = login(&app, "admin@fleet.test", TEST_PASSWORD).await;
    let (status, body) = authed_get(&app, "/api/v1/requests", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_chef_without_service_sees_nothing() {
    let db = create_test_db().await;
    let requester = create_test_user(&db, "USR0011", "u11@fleet.test", "user", None).await;
    create_test_user(&db, "CHF0011", "chef11@fleet.test", "chef", None).await;
    create_request(&db, requester.id).await;
    let app = build_test_app(db).await;

    let token = login(&app, "chef11@fleet.test", TEST_PASSWORD).await;
    let (status, body) = authed_get(&app, "/api/v1/requests", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_chef_sees_only_own_department() {
    let db = create_test_db().await;
    let finance = create_service(&db, "Finance").await;
    let operations = create_service(&db, "Operations").await;

    let fin_user =
        create_test_user(&db, "FIN0001", "fin@fleet.test", "user", Some(finance.id)).await;
    let ops_user =
        create_test_user(&db, "OPS0001", "ops@fleet.test", "user", Some(operations.id)).await;
    create_test_user(&db, "CHF0012", "chef12@fleet.test", "chef", Some(finance.id)).await;

    let fin_request = create_request(&db, fin_user.id).await;
    create_request(&db, ops_user.id).await;
    let app = build_test_app(db).await;

    let token = login(&app, "chef12@fleet.test", TEST_PASSWORD).await;
    let (status, body) = authed_get(&app, "/api/v1/requests", &token).await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_i64().unwrap() as i32, fin_request.id);
    assert_eq!(items[0]["requester"]["service"]["name"], "Finance");
}

#[tokio::test]
async fn test_logistic_and_charoi_see_their_queues() {
    let db = create_test_db().await;
    let requester = create_test_user(&db, "USR0013", "u13@fleet.test", "user", None).await;
    create_test_user(&db, "CHF0013", "chef13@fleet.test", "chef", None).await;
    create_test_user(&db, "LOG0013", "logi13@fleet.test", "logistic", None).await;
    create_test_user(&db, "CHR0013", "char13@fleet.test", "charoi", None).await;

    // One untouched, one chef-approved, one logistic-approved.
    create_request(&db, requester.id).await;
    let chef_approved = create_request(&db, requester.id).await;
    let logistic_approved = create_request(&db, requester.id).await;
    let app = build_test_app(db).await;

    let chef_token = login(&app, "chef13@fleet.test", TEST_PASSWORD).await;
    authed_post(
        &app,
        &format!("/api/v1/approvals/{}", chef_approved.id),
        &chef_token,
        r#"{"status": "approved"}"#,
    )
    .await;
    authed_post(
        &app,
        &format!("/api/v1/approvals/{}", logistic_approved.id),
        &chef_token,
        r#"{"status": "approved"}"#,
    )
    .await;

    let logistic_token = login(&app, "logi13@fleet.test", TEST_PASSWORD).await;
    authed_post(
        &app,
        &format!("/api/v1/approvals/{}", logistic_approved.id),
        &logistic_token,
        r#"{"status": "approved"}"#,
    )
    .await;

    // Logistic queue: only requests waiting on step 2.
    let (status, body) = authed_get(&app, "/api/v1/requests", &logistic_token).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_i64().unwrap() as i32, chef_approved.id);
    assert_eq!(items[0]["status"], "approved_by_chef");

    // Charoi queue: only requests waiting on step 3.
    let charoi_token = login(&app, "char13@fleet.test", TEST_PASSWORD).await;
    let (status, body) = authed_get(&app, "/api/v1/requests", &charoi_token).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_i64().unwrap() as i32, logistic_approved.id);
    assert_eq!(items[0]["status"], "approved_by_logistic");
}

#[tokio::test]
async fn test_regular_user_cannot_list_requests() {
    let db = create_test_db().await;
    create_test_user(&db, "USR0014", "u14@fleet.test", "user", None).await;
    let app = build_test_app(db).await;

    let token = login(&app, "u14@fleet.test", TEST_PASSWORD).await;
    let (status, _) = authed_get(&app, "/api/v1/requests", &token).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_my_requests_returns_only_own() {
    let db = create_test_db().await;
    let alice = create_test_user(&db, "ALC0002", "alice2@fleet.test", "user", None).await;
    let bob = create_test_user(&db, "BOB0002", "bob2@fleet.test", "user", None).await;
    create_request(&db, alice.id).await;
    create_request(&db, alice.id).await;
    create_request(&db, bob.id).await;
    let app = build_test_app(db).await;

    let token = login(&app, "alice2@fleet.test", TEST_PASSWORD).await;
    let (status, body) = authed_get(&app, "/api/v1/requests/my-requests", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_request_visibility() {
    let db = create_test_db().await;
    let finance = create_service(&db, "Finance").await;
    let owner = create_test_user(&db, "OWN0001", "owner@fleet.test", "user", Some(finance.id)).await;
    create_test_user(&db, "STR0001", "stranger@fleet.test", "user", None).await;
    create_test_user(&db, "CHF0015", "chef15@fleet.test", "chef", Some(finance.id)).await;
    let request = create_request(&db, owner.id).await;
    let app = build_test_app(db).await;

    // Owner can read it.
    let owner_token = login(&app, "owner@fleet.test", TEST_PASSWORD).await;
    let (status, _) = authed_get(&app, &format!("/api/v1/requests/{}", request.id), &owner_token).await;
    assert_eq!(status, StatusCode::OK);

    // A same-department chef can read it.
    let chef_token = login(&app, "chef15@fleet.test", TEST_PASSWORD).await;
    let (status, _) = authed_get(&app, &format!("/api/v1/requests/{}", request.id), &chef_token).await;
    assert_eq!(status, StatusCode::OK);

    // Another plain user cannot.
    let stranger_token = login(&app, "stranger@fleet.test", TEST_PASSWORD).await;
    let (status, _) = authed_get(
        &app,
        &format!("/api/v1/requests/{}", request.id),
        &stranger_token,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_assignment_updates_vehicle_and_driver() {
    let db = create_test_db().await;
    let requester = create_test_user(&db, "USR0016", "u16@fleet.test", "user", None).await;
    create_test_user(&db, "LOG0016", "logi16@fleet.test", "logistic", None).await;
    let assignable =
        create_test_user(&db, "DRV0016", "drv16@fleet.test", "driver", None).await;
    let vehicle = create_vehicle(&db, "CE-016-AA", "VIN0016").await;
    let request = create_request(&db, requester.id).await;
    let app = build_test_app(db).await;

    let token = login(&app, "logi16@fleet.test", TEST_PASSWORD).await;
    let (status, body) = authed_put(
        &app,
        &format!("/api/v1/requests/{}/assign", request.id),
        &token,
        &serde_json::json!({
            "vehicle_id": vehicle.id,
            "driver_id": assignable.id
        })
        .to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vehicle"]["plate_number"], "CE-016-AA");
    assert_eq!(body["driver"]["matricule"], "DRV0016");

    // Unknown vehicle id is rejected.
    let (status, _) = authed_put(
        &app,
        &format!("/api/v1/requests/{}/assign", request.id),
        &token,
        r#"{"vehicle_id": 9999}"#,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_policy() {
    let db = create_test_db().await;
    let owner = create_test_user(&db, "OWN0002", "owner2@fleet.test", "user", None).await;
    create_test_user(&db, "CHF0017", "chef17@fleet.test", "chef", None).await;
    create_test_user(&db, "ADM0017", "admin17@fleet.test", "admin", None).await;
    let pending_request = create_request(&db, owner.id).await;
    let approved_request = create_request(&db, owner.id).await;
    let app = build_test_app(db).await;

    // Owner deletes while pending.
    let owner_token = login(&app, "owner2@fleet.test", TEST_PASSWORD).await;
    let (status, _) = authed_delete(
        &app,
        &format!("/api/v1/requests/{}", pending_request.id),
        &owner_token,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // After an approval, the owner may no longer delete.
    let chef_token = login(&app, "chef17@fleet.test", TEST_PASSWORD).await;
    authed_post(
        &app,
        &format!("/api/v1/approvals/{}", approved_request.id),
        &chef_token,
        r#"{"status": "approved"}"#,
    )
    .await;

    let (status, _) = authed_delete(
        &app,
        &format!("/api/v1/requests/{}", approved_request.id),
        &owner_token,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin still can.
    let admin_token = login(&app, "admin17@fleet.test", TEST_PASSWORD).await;
    let (status, _) = authed_delete(
        &app,
        &format!("/api/v1/requests/{}", approved_request.id),
        &admin_token,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = authed_get(
        &app,
        &format!("/api/v1/requests/{}", approved_request.id),
        &admin_token,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pending_count() {
    let db = create_test_db().await;
    let requester = create_test_user(&db, "USR0018", "u18@fleet.test", "user", None).await;
    create_test_user(&db, "CHF0018", "chef18@fleet.test", "chef", None).await;
    create_test_user(&db, "LOG0018", "logi18@fleet.test", "logistic", None).await;
    create_request(&db, requester.id).await;
    create_request(&db, requester.id).await;
    let decided = create_request(&db, requester.id).await;
    let app = build_test_app(db).await;

    let chef_token = login(&app, "chef18@fleet.test", TEST_PASSWORD).await;
    authed_post(
        &app,
        &format!("/api/v1/approvals/{}", decided.id),
        &chef_token,
        r#"{"status": "approved"}"#,
    )
    .await;

    let logistic_token = login(&app, "logi18@fleet.test", TEST_PASSWORD).await;
    let (status, body) = authed_get(&app, "/api/v1/requests/count/pending", &logistic_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    // A chef is not part of the assignment desk.
    let (status, _) = authed_get(&app, "/api/v1/requests/count/pending", &chef_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
