//! Users endpoint integration tests
//!
//! Covers signup, duplicate detection, role-dependent listing and the
//! self-service update rules.

use axum::http::StatusCode;

mod common;
use common::*;

fn signup_payload(matricule: &str, email: &str, telephone: &str) -> String {
    serde_json::json!({
        "matricule": matricule,
        "first_name": "New",
        "last_name": "Person",
        "telephone": telephone,
        "email": email,
        "password": TEST_PASSWORD
    })
    .to_string()
}

#[tokio::test]
async fn test_signup_creates_pending_user_with_default_role() {
    let db = create_test_db().await;
    let app = build_test_app(db).await;

    let (status, body) = anon_post(
        &app,
        "/api/v1/users",
        &signup_payload("NEW0001", "new1@fleet.test", "+237-51-0001"),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["role"]["name"], "user");
}

#[tokio::test]
async fn test_signup_duplicates_conflict_with_field_specific_detail() {
    let db = create_test_db().await;
    create_test_user(&db, "DUP0001", "dup1@fleet.test", "user", None).await;
    let app = build_test_app(db).await;

    let (status, body) = anon_post(
        &app,
        "/api/v1/users",
        &signup_payload("DUP0001", "other@fleet.test", "+237-51-0002"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["detail"].as_str().unwrap().contains("Matricule"));

    let (status, body) = anon_post(
        &app,
        "/api/v1/users",
        &signup_payload("DUP0002", "dup1@fleet.test", "+237-51-0003"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["detail"].as_str().unwrap().contains("Email"));

    let (status, body) = anon_post(
        &app,
        "/api/v1/users",
        &signup_payload("DUP0003", "dup3@fleet.test", "+237-DUP0001"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["detail"].as_str().unwrap().contains("Telephone"));
}

#[tokio::test]
async fn test_admin_lists_all_users() {
    let db = create_test_db().await;
    create_test_user(&db, "ADM0051", "admin51@fleet.test", "admin", None).await;
    create_test_user(&db, "USR0051", "u51@fleet.test", "user", None).await;
    create_test_user(&db, "USR0052", "u52@fleet.test", "user", None).await;
    let app = build_test_app(db).await;

    let token = login(&app, "admin51@fleet.test", TEST_PASSWORD).await;
    let (status, body) = authed_get(&app, "/api/v1/users", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    // Search narrows the list.
    let (status, body) = authed_get(&app, "/api/v1/users?search=USR0051", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_non_admin_may_only_list_drivers() {
    let db = create_test_db().await;
    create_test_user(&db, "CHF0052", "chef52@fleet.test", "chef", None).await;
    create_test_user(&db, "DRV0052", "drv52@fleet.test", "driver", None).await;
    create_test_user(&db, "USR0053", "u53@fleet.test", "user", None).await;
    let app = build_test_app(db).await;

    let token = login(&app, "chef52@fleet.test", TEST_PASSWORD).await;

    let (status, _) = authed_get(&app, "/api/v1/users", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = authed_get(&app, "/api/v1/users?role=driver", &token).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["matricule"], "DRV0052");

    // Plain users get nothing at all.
    let user_token = login(&app, "u53@fleet.test", TEST_PASSWORD).await;
    let (status, _) = authed_get(&app, "/api/v1/users?role=driver", &user_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_self_update_cannot_touch_role_or_status() {
    let db = create_test_db().await;
    let me = create_test_user(&db, "USR0054", "u54@fleet.test", "user", None).await;
    let app = build_test_app(db).await;

    let token = login(&app, "u54@fleet.test", TEST_PASSWORD).await;

    let (status, body) = authed_put(
        &app,
        &format!("/api/v1/users/{}", me.id),
        &token,
        r#"{"first_name": "Renamed"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Renamed");

    let (status, _) = authed_put(
        &app,
        &format!("/api/v1/users/{}", me.id),
        &token,
        r#"{"status": "active", "role_id": 1}"#,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_rechecks_unique_email() {
    let db = create_test_db().await;
    create_test_user(&db, "ADM0055", "admin55@fleet.test", "admin", None).await;
    let target = create_test_user(&db, "USR0055", "u55@fleet.test", "user", None).await;
    create_test_user(&db, "USR0056", "u56@fleet.test", "user", None).await;
    let app = build_test_app(db).await;

    let token = login(&app, "admin55@fleet.test", TEST_PASSWORD).await;
    let (status, body) = authed_put(
        &app,
        &format!("/api/v1/users/{}", target.id),
        &token,
        r#"{"email": "u56@fleet.test"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["detail"].as_str().unwrap().contains("Email"));
}

#[tokio::test]
async fn test_users_cannot_update_each_other() {
    let db = create_test_db().await;
    create_test_user(&db, "USR0057", "u57@fleet.test", "user", None).await;
    let victim = create_test_user(&db, "USR0058", "u58@fleet.test", "user", None).await;
    let app = build_test_app(db).await;

    let token = login(&app, "u57@fleet.test", TEST_PASSWORD).await;
    let (status, _) = authed_put(
        &app,
        &format!("/api/v1/users/{}", victim.id),
        &token,
        r#"{"first_name": "Hacked"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_user_rules() {
    let db = create_test_db().await;
    let admin = create_test_user(&db, "ADM0059", "admin59@fleet.test", "admin", None).await;
    let target = create_test_user(&db, "USR0059", "u59@fleet.test", "user", None).await;
    let app = build_test_app(db).await;

    let token = login(&app, "admin59@fleet.test", TEST_PASSWORD).await;

    // Not yourself.
    let (status, _) = authed_delete(&app, &format!("/api/v1/users/{}", admin.id), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = authed_delete(&app, &format!("/api/v1/users/{}", target.id), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = authed_get(&app, &format!("/api/v1/users/{}", target.id), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_users_by_role_requires_fleet_manage() {
    let db = create_test_db().await;
    create_test_user(&db, "ADM0060", "admin60@fleet.test", "admin", None).await;
    create_test_user(&db, "CHF0060", "chef60@fleet.test", "chef", None).await;
    create_test_user(&db, "DRV0060", "drv60@fleet.test", "driver", None).await;
    let app = build_test_app(db).await;

    let chef_token = login(&app, "chef60@fleet.test", TEST_PASSWORD).await;
    let (status, _) = authed_get(&app, "/api/v1/users/by-role/driver", &chef_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin_token = login(&app, "admin60@fleet.test", TEST_PASSWORD).await;
    let (status, body) = authed_get(&app, "/api/v1/users/by-role/driver", &admin_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}
