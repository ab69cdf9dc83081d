use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, QueryOrder, Set};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::{Authorized, FleetManage};
use crate::models::prelude::*;
use crate::models::{panne, reparation};
use crate::state::AppState;

/// Create reparation routes (all require fleet.manage)
pub fn reparations_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_reparations).post(create_reparation))
        .route(
            "/{id}",
            get(get_reparation)
                .put(update_reparation)
                .delete(delete_reparation),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ReparationPayload {
    pub panne_id: i32,
    #[serde(default)]
    pub cost: f64,
    pub receipt: String,
    pub garage_id: Option<i32>,
    pub repair_date: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ReparationUpdatePayload {
    pub cost: Option<f64>,
    pub receipt: Option<String>,
    pub garage_id: Option<i32>,
    pub repair_date: Option<chrono::DateTime<chrono::Utc>>,
    pub status: Option<String>,
}

/// Open a reparation for a panne; the panne moves to in_progress.
async fn create_reparation(
    State(state): State<AppState>,
    Authorized(_actor, _): Authorized<FleetManage>,
    Json(payload): Json<ReparationPayload>,
) -> Result<(StatusCode, Json<reparation::Model>)> {
    let panne_row = Panne::find_by_id(payload.panne_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Panne with id {} not found.", payload.panne_id))
        })?;

    if let Some(garage_id) = payload.garage_id {
        Garage::find_by_id(garage_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Garage with id {} not found.", garage_id)))?;
    }

    let new_reparation = reparation::ActiveModel {
        panne_id: Set(payload.panne_id),
        cost: Set(payload.cost),
        receipt: Set(payload.receipt),
        garage_id: Set(payload.garage_id),
        repair_date: Set(payload.repair_date),
        status: Set("in_progress".to_string()),
        ..Default::default()
    };

    let created = new_reparation.insert(&state.db).await?;

    let mut panne_model: panne::ActiveModel = panne_row.into();
    panne_model.status = Set("in_progress".to_string());
    panne_model.update(&state.db).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_reparations(
    State(state): State<AppState>,
    Authorized(_actor, _): Authorized<FleetManage>,
) -> Result<Json<Vec<reparation::Model>>> {
    let records = Reparation::find()
        .order_by_desc(reparation::Column::RepairDate)
        .all(&state.db)
        .await?;
    Ok(Json(records))
}

async fn get_reparation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
) -> Result<Json<reparation::Model>> {
    let found = Reparation::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reparation with id: {} not found.", id)))?;
    Ok(Json(found))
}

/// Update a reparation; completing it resolves the underlying panne.
async fn update_reparation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
    Json(payload): Json<ReparationUpdatePayload>,
) -> Result<Json<reparation::Model>> {
    let existing = Reparation::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reparation with id: {} not found", id)))?;

    if let Some(garage_id) = payload.garage_id {
        Garage::find_by_id(garage_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Garage with id {} not found.", garage_id)))?;
    }

    let panne_id = existing.panne_id;
    let completing = payload.status.as_deref() == Some("completed");

    let mut model: reparation::ActiveModel = existing.into();
    if let Some(cost) = payload.cost {
        model.cost = Set(cost);
    }
    if let Some(receipt) = payload.receipt {
        model.receipt = Set(receipt);
    }
    if payload.garage_id.is_some() {
        model.garage_id = Set(payload.garage_id);
    }
    if let Some(repair_date) = payload.repair_date {
        model.repair_date = Set(repair_date);
    }
    if let Some(status) = payload.status {
        model.status = Set(status);
    }

    let updated = model.update(&state.db).await?;

    if completing {
        if let Some(panne_row) = Panne::find_by_id(panne_id).one(&state.db).await? {
            let mut panne_model: panne::ActiveModel = panne_row.into();
            panne_model.status = Set("resolved".to_string());
            panne_model.update(&state.db).await?;
        }
    }

    Ok(Json(updated))
}

async fn delete_reparation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
) -> Result<StatusCode> {
    let existing = Reparation::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reparation with id: {} not found", id)))?;

    existing.delete(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}
