use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::SESSION_COOKIE_NAME;
use crate::models::prelude::*;
use crate::models::user;
use crate::services::verify_password;
use crate::state::AppState;

/// Create auth routes for session management
pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Matricule or email address
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user_id: i32,
    pub username: String,
    pub role: String,
    pub status: String,
    pub service_id: Option<i32>,
}

// ============================================================================
// Session Cookie Helpers
// ============================================================================

/// Create a session cookie with the given token
fn create_session_cookie(token: &str) -> HeaderValue {
    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/",
        SESSION_COOKIE_NAME, token
    );
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Create a cookie that clears the session
fn clear_session_cookie() -> HeaderValue {
    let cookie = format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE_NAME
    );
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

// ============================================================================
// Session Management Endpoints
// ============================================================================

/// Login with matricule or email plus password.
///
/// Sets the session cookie and returns the token payload for API clients.
async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<Response> {
    let found_user = User::find()
        .filter(
            user::Column::Email
                .eq(&request.username)
                .or(user::Column::Matricule.eq(&request.username)),
        )
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized("Incorrect matricule, email, or password".to_string())
        })?;

    if !verify_password(&request.password, &found_user.hashed_password) {
        return Err(AppError::Unauthorized(
            "Incorrect matricule, email, or password".to_string(),
        ));
    }

    if found_user.status != "active" {
        return Err(AppError::Forbidden(format!(
            "Account access denied. Your account status is '{}'.",
            found_user.status
        )));
    }

    let role = Role::find_by_id(found_user.role_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::Forbidden("User has no role assigned. Cannot log in.".to_string())
        })?;

    let access_token = state
        .tokens
        .create_access_token(found_user.id, &role.name)?;

    let response = Json(LoginResponse {
        access_token: access_token.clone(),
        token_type: "bearer".to_string(),
        user_id: found_user.id,
        username: found_user.email,
        role: role.name,
        status: found_user.status,
        service_id: found_user.service_id,
    });

    Ok((
        [(header::SET_COOKIE, create_session_cookie(&access_token))],
        response,
    )
        .into_response())
}

/// Logout - clears the session cookie
async fn logout() -> Response {
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(serde_json::json!({"message": "Logged out"})),
    )
        .into_response()
}
