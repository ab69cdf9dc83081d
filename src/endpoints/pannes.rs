use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::{Authenticated, Authorized, FleetManage};
use crate::models::panne;
use crate::models::prelude::*;
use crate::state::AppState;

/// Create panne (breakdown report) routes
pub fn pannes_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_pannes).post(create_panne))
        .route("/{id}", get(get_panne).put(update_panne).delete(delete_panne))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct PanneCreatePayload {
    pub vehicle_id: i32,
    pub category_id: i32,
    pub description: Option<String>,
    pub panne_date: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct PanneUpdatePayload {
    pub description: Option<String>,
    pub status: Option<String>,
    pub panne_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct PaginatedPannes {
    pub total_count: u64,
    pub items: Vec<panne::Model>,
}

/// Report a breakdown (any authenticated user)
async fn create_panne(
    State(state): State<AppState>,
    Authenticated(_actor): Authenticated,
    Json(payload): Json<PanneCreatePayload>,
) -> Result<(StatusCode, Json<panne::Model>)> {
    Vehicle::find_by_id(payload.vehicle_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Vehicle with id {} not found.", payload.vehicle_id))
        })?;

    CategoryPanne::find_by_id(payload.category_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Panne category with id {} not found.",
                payload.category_id
            ))
        })?;

    let new_panne = panne::ActiveModel {
        vehicle_id: Set(payload.vehicle_id),
        category_id: Set(payload.category_id),
        description: Set(payload.description),
        status: Set("active".to_string()),
        panne_date: Set(payload.panne_date),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = new_panne.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Paginated overview of all pannes (requires fleet.manage)
async fn list_pannes(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
    Authorized(_actor, _): Authorized<FleetManage>,
) -> Result<Json<PaginatedPannes>> {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * page_size;

    let total_count = Panne::find().count(&state.db).await?;

    let items = Panne::find()
        .order_by_desc(panne::Column::PanneDate)
        .offset(offset)
        .limit(page_size)
        .all(&state.db)
        .await?;

    Ok(Json(PaginatedPannes { total_count, items }))
}

async fn get_panne(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<panne::Model>> {
    let found = Panne::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Panne with id: {} not found.", id)))?;
    Ok(Json(found))
}

async fn update_panne(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
    Json(payload): Json<PanneUpdatePayload>,
) -> Result<Json<panne::Model>> {
    let existing = Panne::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Panne with id: {} not found", id)))?;

    let mut model: panne::ActiveModel = existing.into();
    if payload.description.is_some() {
        model.description = Set(payload.description);
    }
    if let Some(status) = payload.status {
        model.status = Set(status);
    }
    if let Some(panne_date) = payload.panne_date {
        model.panne_date = Set(panne_date);
    }

    let updated = model.update(&state.db).await?;
    Ok(Json(updated))
}

async fn delete_panne(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
) -> Result<StatusCode> {
    let existing = Panne::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Panne with id: {} not found", id)))?;

    existing.delete(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}
