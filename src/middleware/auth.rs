//! Authentication middleware for API routes
//!
//! Requires a valid access token, either as a Bearer header or in the
//! session cookie set by the login endpoint.

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::middleware::roles::RoleKind;
use crate::models::prelude::*;
use crate::models::user;
use crate::state::AppState;

pub const SESSION_COOKIE_NAME: &str = "fleetdash_session";

/// Authenticated caller stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user: user::Model,
    pub role: RoleKind,
}

/// Auth middleware that validates access tokens
///
/// Skips the public signup endpoint. Returns 401 Unauthorized if the token
/// is missing or invalid, or if the account is not active.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    // Signup is the one unauthenticated operation behind this layer.
    if req.method() == Method::POST && req.uri().path() == "/api/v1/users" {
        return next.run(req).await;
    }

    let token = match extract_token(&req) {
        Some(t) => t,
        None => {
            return unauthorized_response("Missing or invalid credentials");
        }
    };

    let auth_user = match validate_token_and_get_user(&state, &token).await {
        Ok(u) => u,
        Err(msg) => {
            return unauthorized_response(&msg);
        }
    };

    req.extensions_mut().insert(auth_user);

    next.run(req).await
}

/// Extract the access token from the Authorization header or session cookie
fn extract_token(req: &Request) -> Option<String> {
    if let Some(auth_header) = req.headers().get(AUTHORIZATION) {
        if let Some(token) = auth_header.to_str().ok()?.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    let cookie_header = req.headers().get(COOKIE)?.to_str().ok()?;
    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE_NAME && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Validate the token and fetch the active user plus their role
async fn validate_token_and_get_user(
    state: &AppState,
    token: &str,
) -> Result<AuthenticatedUser, String> {
    let claims = state
        .tokens
        .decode_token(token)
        .map_err(|_| "Invalid or expired token".to_string())?;

    let user_id: i32 = claims
        .sub
        .parse()
        .map_err(|_| "Invalid token subject".to_string())?;

    let found_user = User::find_by_id(user_id)
        .filter(user::Column::Status.eq("active"))
        .one(&state.db)
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| "User not found or inactive".to_string())?;

    let role_row = Role::find_by_id(found_user.role_id)
        .one(&state.db)
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| "User has no role assigned".to_string())?;

    let role = RoleKind::from_name(&role_row.name)
        .ok_or_else(|| format!("Unknown role '{}'", role_row.name))?;

    Ok(AuthenticatedUser {
        user: found_user,
        role,
    })
}

/// Create a 401 Unauthorized JSON response
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "detail": message
        })),
    )
        .into_response()
}
