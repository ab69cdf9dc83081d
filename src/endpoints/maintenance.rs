use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, QueryOrder, Set};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::{Authorized, FleetManage};
use crate::models::maintenance;
use crate::models::prelude::*;
use crate::state::AppState;

/// Create maintenance record routes (all require fleet.manage)
pub fn maintenance_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_maintenances).post(create_maintenance))
        .route(
            "/{id}",
            get(get_maintenance)
                .put(update_maintenance)
                .delete(delete_maintenance),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct MaintenancePayload {
    pub category_id: Option<i32>,
    pub vehicle_id: i32,
    pub garage_id: Option<i32>,
    #[serde(default)]
    pub cost: f64,
    pub receipt: String,
    pub maintenance_date: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct MaintenanceUpdatePayload {
    pub category_id: Option<i32>,
    pub garage_id: Option<i32>,
    pub cost: Option<f64>,
    pub receipt: Option<String>,
    pub maintenance_date: Option<chrono::DateTime<chrono::Utc>>,
    pub status: Option<String>,
}

async fn check_refs(
    state: &AppState,
    vehicle_id: Option<i32>,
    category_id: Option<i32>,
    garage_id: Option<i32>,
) -> Result<()> {
    if let Some(vehicle_id) = vehicle_id {
        Vehicle::find_by_id(vehicle_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Vehicle with id {} not found.", vehicle_id))
            })?;
    }
    if let Some(category_id) = category_id {
        CategoryMaintenance::find_by_id(category_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Maintenance category with id {} not found.",
                    category_id
                ))
            })?;
    }
    if let Some(garage_id) = garage_id {
        Garage::find_by_id(garage_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Garage with id {} not found.", garage_id)))?;
    }
    Ok(())
}

async fn create_maintenance(
    State(state): State<AppState>,
    Authorized(_actor, _): Authorized<FleetManage>,
    Json(payload): Json<MaintenancePayload>,
) -> Result<(StatusCode, Json<maintenance::Model>)> {
    check_refs(
        &state,
        Some(payload.vehicle_id),
        payload.category_id,
        payload.garage_id,
    )
    .await?;

    let new_maintenance = maintenance::ActiveModel {
        category_id: Set(payload.category_id),
        vehicle_id: Set(payload.vehicle_id),
        garage_id: Set(payload.garage_id),
        cost: Set(payload.cost),
        receipt: Set(payload.receipt),
        maintenance_date: Set(payload.maintenance_date),
        created_at: Set(Utc::now()),
        status: Set("active".to_string()),
        ..Default::default()
    };

    let created = new_maintenance.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_maintenances(
    State(state): State<AppState>,
    Authorized(_actor, _): Authorized<FleetManage>,
) -> Result<Json<Vec<maintenance::Model>>> {
    let records = Maintenance::find()
        .order_by_desc(maintenance::Column::MaintenanceDate)
        .all(&state.db)
        .await?;
    Ok(Json(records))
}

async fn get_maintenance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
) -> Result<Json<maintenance::Model>> {
    let found = Maintenance::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Maintenance record with id: {} not found.", id))
        })?;
    Ok(Json(found))
}

async fn update_maintenance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
    Json(payload): Json<MaintenanceUpdatePayload>,
) -> Result<Json<maintenance::Model>> {
    let existing = Maintenance::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Maintenance record with id: {} not found", id))
        })?;

    check_refs(&state, None, payload.category_id, payload.garage_id).await?;

    let mut model: maintenance::ActiveModel = existing.into();
    if payload.category_id.is_some() {
        model.category_id = Set(payload.category_id);
    }
    if payload.garage_id.is_some() {
        model.garage_id = Set(payload.garage_id);
    }
    if let Some(cost) = payload.cost {
        model.cost = Set(cost);
    }
    if let Some(receipt) = payload.receipt {
        model.receipt = Set(receipt);
    }
    if let Some(maintenance_date) = payload.maintenance_date {
        model.maintenance_date = Set(maintenance_date);
    }
    if let Some(status) = payload.status {
        model.status = Set(status);
    }

    let updated = model.update(&state.db).await?;
    Ok(Json(updated))
}

async fn delete_maintenance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
) -> Result<StatusCode> {
    let existing = Maintenance::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Maintenance record with id: {} not found", id))
        })?;

    existing.delete(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}
