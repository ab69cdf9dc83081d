use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, ModelTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::{Authenticated, Authorized, FleetManage, RoleKind};
use crate::models::prelude::*;
use crate::models::{role, user};
use crate::schemas::user::UserOut;
use crate::services::hash_password;
use crate::state::AppState;

/// Create users routes
///
/// Signup (`POST /`) is exempted from the auth layer by the middleware and
/// open to anonymous callers.
pub fn users_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_users).post(signup))
        .route("/me", get(get_me))
        .route("/by-role/{role_name}", get(get_users_by_role))
        .route(
            "/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserPayload {
    pub matricule: String,
    pub first_name: String,
    pub last_name: String,
    pub telephone: String,
    pub service_id: Option<i32>,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub telephone: Option<String>,
    pub email: Option<String>,
    pub service_id: Option<i32>,
    pub role_id: Option<i32>,
    pub status: Option<String>,
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// Current caller's profile
async fn get_me(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
) -> Result<Json<UserOut>> {
    let response = UserOut::from_model(&state.db, actor.user).await?;
    Ok(Json(response))
}

/// Public signup endpoint; accounts start pending with the `user` role.
async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<(StatusCode, Json<UserOut>)> {
    let existing = User::find()
        .filter(
            user::Column::Matricule
                .eq(&payload.matricule)
                .or(user::Column::Email.eq(&payload.email))
                .or(user::Column::Telephone.eq(&payload.telephone)),
        )
        .one(&state.db)
        .await?;

    if let Some(existing) = existing {
        if existing.matricule == payload.matricule {
            return Err(AppError::Conflict("Matricule already exists".to_string()));
        }
        if existing.email == payload.email {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        return Err(AppError::Conflict(
            "Telephone number already in use".to_string(),
        ));
    }

    if let Some(service_id) = payload.service_id {
        Service::find_by_id(service_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Service with id {} not found.", service_id))
            })?;
    }

    let default_role = Role::find()
        .filter(role::Column::Name.eq(RoleKind::User.as_str()))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Internal("Default 'user' role not found.".to_string()))?;

    let hashed = hash_password(&payload.password)?;

    let new_user = user::ActiveModel {
        matricule: Set(payload.matricule),
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        telephone: Set(payload.telephone),
        service_id: Set(payload.service_id),
        email: Set(payload.email),
        hashed_password: Set(hashed),
        role_id: Set(default_role.id),
        status: Set("pending".to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = new_user.insert(&state.db).await?;
    let response = UserOut::from_model(&state.db, created).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// List users.
///
/// Admins see everyone; charoi/logistic/chef may only use this endpoint to
/// fetch the active driver list.
async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
    Authenticated(actor): Authenticated,
) -> Result<Json<Vec<UserOut>>> {
    let wants_drivers = params.role.as_deref() == Some("driver");

    if !actor.role.is_admin() {
        let may_list_drivers = matches!(
            actor.role,
            RoleKind::Charoi | RoleKind::Logistic | RoleKind::Chef
        );
        if !(may_list_drivers && wants_drivers) {
            return Err(AppError::Forbidden(
                "Not authorized to view this list of users.".to_string(),
            ));
        }
    }

    let mut query = User::find();

    if let Some(role_name) = &params.role {
        // Only active accounts are assignable.
        query = query
            .join(JoinType::InnerJoin, user::Relation::Role.def())
            .filter(role::Column::Name.eq(role_name.to_lowercase()))
            .filter(user::Column::Status.eq("active"));
    }

    if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(
            user::Column::Matricule
                .contains(search)
                .or(user::Column::FirstName.contains(search))
                .or(user::Column::LastName.contains(search))
                .or(user::Column::Email.contains(search)),
        );
    }

    let rows = query
        .order_by_asc(user::Column::Id)
        .offset(params.skip.unwrap_or(0))
        .limit(params.limit.unwrap_or(100))
        .all(&state.db)
        .await?;

    let mut responses = Vec::with_capacity(rows.len());
    for row in rows {
        responses.push(UserOut::from_model(&state.db, row).await?);
    }

    Ok(Json(responses))
}

/// Get user by ID (any authenticated user)
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<UserOut>> {
    let response = UserOut::load(&state.db, id).await?;
    Ok(Json(response))
}

/// All users holding a role (requires fleet.manage)
async fn get_users_by_role(
    State(state): State<AppState>,
    Path(role_name): Path<String>,
    Authorized(_actor, _): Authorized<FleetManage>,
) -> Result<Json<Vec<UserOut>>> {
    let rows = User::find()
        .join(JoinType::InnerJoin, user::Relation::Role.def())
        .filter(role::Column::Name.eq(role_name.to_lowercase()))
        .order_by_asc(user::Column::Id)
        .all(&state.db)
        .await?;

    let mut responses = Vec::with_capacity(rows.len());
    for row in rows {
        responses.push(UserOut::from_model(&state.db, row).await?);
    }

    Ok(Json(responses))
}

/// Update a user. An admin can update anyone; a user only themselves, and
/// never their own role or status.
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authenticated(actor): Authenticated,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Json<UserOut>> {
    let existing_user = User::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id: {} not found", id)))?;

    let is_admin = actor.role.is_admin();
    let is_updating_self = actor.user.id == existing_user.id;

    if !is_admin && !is_updating_self {
        return Err(AppError::Forbidden(
            "Not authorized to update this user".to_string(),
        ));
    }

    if !is_admin && (payload.role_id.is_some() || payload.status.is_some()) {
        return Err(AppError::Forbidden(
            "Not authorized to change role or status".to_string(),
        ));
    }

    // Re-check uniqueness on changed unique fields.
    if let Some(email) = &payload.email {
        if email != &existing_user.email {
            let taken = User::find()
                .filter(user::Column::Email.eq(email))
                .filter(user::Column::Id.ne(id))
                .one(&state.db)
                .await?;
            if taken.is_some() {
                return Err(AppError::Conflict("Email already registered".to_string()));
            }
        }
    }
    if let Some(telephone) = &payload.telephone {
        if telephone != &existing_user.telephone {
            let taken = User::find()
                .filter(user::Column::Telephone.eq(telephone))
                .filter(user::Column::Id.ne(id))
                .one(&state.db)
                .await?;
            if taken.is_some() {
                return Err(AppError::Conflict(
                    "Telephone number already in use".to_string(),
                ));
            }
        }
    }

    if let Some(role_id) = payload.role_id {
        Role::find_by_id(role_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Role with ID {} not found", role_id)))?;
    }
    if let Some(service_id) = payload.service_id {
        Service::find_by_id(service_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Service with id {} not found.", service_id))
            })?;
    }

    let mut user_model: user::ActiveModel = existing_user.into();
    if let Some(first_name) = payload.first_name {
        user_model.first_name = Set(first_name);
    }
    if let Some(last_name) = payload.last_name {
        user_model.last_name = Set(last_name);
    }
    if let Some(telephone) = payload.telephone {
        user_model.telephone = Set(telephone);
    }
    if let Some(email) = payload.email {
        user_model.email = Set(email);
    }
    if payload.service_id.is_some() {
        user_model.service_id = Set(payload.service_id);
    }
    if let Some(role_id) = payload.role_id {
        user_model.role_id = Set(role_id);
    }
    if let Some(status) = payload.status {
        user_model.status = Set(status);
    }

    let updated = user_model.update(&state.db).await?;
    let response = UserOut::from_model(&state.db, updated).await?;

    Ok(Json(response))
}

/// Delete a user (requires fleet.manage)
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(actor, _): Authorized<FleetManage>,
) -> Result<StatusCode> {
    if id == actor.user.id {
        return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
    }

    let existing_user = User::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id: {} not found", id)))?;

    existing_user.delete(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}
