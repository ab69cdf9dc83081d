use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::{Authenticated, Authorized, FleetManage};
use crate::models::prelude::*;
use crate::models::role;
use crate::state::AppState;

/// Create roles routes
pub fn roles_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route(
            "/{id}",
            get(get_role).put(update_role).delete(delete_role),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct RolePayload {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoleUpdatePayload {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// List all roles (any authenticated user, e.g. for signup forms)
async fn list_roles(
    State(state): State<AppState>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<Vec<role::Model>>> {
    let roles = Role::find()
        .order_by_asc(role::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(roles))
}

async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<role::Model>> {
    let found = Role::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Role with id: {} not found.", id)))?;
    Ok(Json(found))
}

async fn create_role(
    State(state): State<AppState>,
    Authorized(_actor, _): Authorized<FleetManage>,
    Json(payload): Json<RolePayload>,
) -> Result<(StatusCode, Json<role::Model>)> {
    let name = payload.name.to_lowercase();

    let existing = Role::find()
        .filter(role::Column::Name.eq(&name))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "Role with name '{}' already exists.",
            name
        )));
    }

    let new_role = role::ActiveModel {
        name: Set(name),
        description: Set(payload.description),
        ..Default::default()
    };

    let created = new_role.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
    Json(payload): Json<RoleUpdatePayload>,
) -> Result<Json<role::Model>> {
    let existing = Role::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Role with id: {} not found.", id)))?;

    if let Some(name) = &payload.name {
        let name = name.to_lowercase();
        if name != existing.name {
            let taken = Role::find()
                .filter(role::Column::Name.eq(&name))
                .filter(role::Column::Id.ne(id))
                .one(&state.db)
                .await?;
            if taken.is_some() {
                return Err(AppError::Conflict(format!(
                    "Role with name '{}' already exists.",
                    name
                )));
            }
        }
    }

    let mut role_model: role::ActiveModel = existing.into();
    if let Some(name) = payload.name {
        role_model.name = Set(name.to_lowercase());
    }
    if payload.description.is_some() {
        role_model.description = Set(payload.description);
    }

    let updated = role_model.update(&state.db).await?;
    Ok(Json(updated))
}

async fn delete_role(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
) -> Result<StatusCode> {
    let existing = Role::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Role with id: {} not found.", id)))?;

    existing.delete(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}
