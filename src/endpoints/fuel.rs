use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::{Authenticated, Authorized, FleetManage};
use crate::models::prelude::*;
use crate::models::{fuel, trip};
use crate::state::AppState;

/// Create fuel record routes
pub fn fuel_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_fuel_records).post(create_fuel_record))
        .route("/check-eligibility/{vehicle_id}", get(check_eligibility))
        .route(
            "/{id}",
            get(get_fuel_record)
                .put(update_fuel_record)
                .delete(delete_fuel_record),
        )
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct FuelCreatePayload {
    pub vehicle_id: i32,
    pub fuel_type_id: i32,
    #[validate(range(exclusive_min = 0.0, message = "Fuel quantity must be greater than zero"))]
    pub quantity: f64,
    #[validate(range(
        exclusive_min = 0.0,
        message = "Price per liter must be greater than zero"
    ))]
    pub price_per_liter: f64,
}

#[derive(Debug, Deserialize)]
pub struct FuelUpdatePayload {
    pub vehicle_id: Option<i32>,
    pub fuel_type_id: Option<i32>,
    pub quantity: Option<f64>,
    pub price_per_liter: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct FuelListParams {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub vehicle_id: Option<i32>,
    pub fuel_type_id: Option<i32>,
    pub date_after: Option<NaiveDate>,
    pub date_before: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct EligibilityResponse {
    pub eligible: bool,
    pub message: String,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// Record a fuel purchase. Cost is always computed server-side.
async fn create_fuel_record(
    State(state): State<AppState>,
    Authenticated(_actor): Authenticated,
    Json(payload): Json<FuelCreatePayload>,
) -> Result<(StatusCode, Json<fuel::Model>)> {
    payload.validate()?;

    Vehicle::find_by_id(payload.vehicle_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Vehicle with ID {} not found.", payload.vehicle_id))
        })?;

    FuelType::find_by_id(payload.fuel_type_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Fuel type with ID {} not found.",
                payload.fuel_type_id
            ))
        })?;

    let cost = round2(payload.quantity * payload.price_per_liter);

    let new_record = fuel::ActiveModel {
        vehicle_id: Set(payload.vehicle_id),
        fuel_type_id: Set(payload.fuel_type_id),
        quantity: Set(payload.quantity),
        price_per_liter: Set(payload.price_per_liter),
        cost: Set(cost),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = new_record.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get a fuel record by id (any authenticated user)
async fn get_fuel_record(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<fuel::Model>> {
    let found = Fuel::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Fuel record not found".to_string()))?;
    Ok(Json(found))
}

/// List fuel records with optional filtering and pagination
async fn list_fuel_records(
    State(state): State<AppState>,
    Query(params): Query<FuelListParams>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<Vec<fuel::Model>>> {
    let mut query = Fuel::find();

    if let Some(vehicle_id) = params.vehicle_id {
        query = query.filter(fuel::Column::VehicleId.eq(vehicle_id));
    }
    if let Some(fuel_type_id) = params.fuel_type_id {
        query = query.filter(fuel::Column::FuelTypeId.eq(fuel_type_id));
    }
    if let Some(date_after) = params.date_after {
        query = query.filter(fuel::Column::CreatedAt.gte(date_after.and_time(NaiveTime::MIN).and_utc()));
    }
    if let Some(date_before) = params.date_before {
        let next_day = date_before
            .checked_add_days(chrono::Days::new(1))
            .unwrap_or(date_before);
        query = query.filter(fuel::Column::CreatedAt.lt(next_day.and_time(NaiveTime::MIN).and_utc()));
    }

    let records = query
        .order_by_desc(fuel::Column::CreatedAt)
        .offset(params.skip.unwrap_or(0))
        .limit(params.limit.unwrap_or(100))
        .all(&state.db)
        .await?;

    Ok(Json(records))
}

/// Update a fuel record (requires fleet.manage).
///
/// Cost is recalculated whenever quantity or price changes.
async fn update_fuel_record(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
    Json(payload): Json<FuelUpdatePayload>,
) -> Result<Json<fuel::Model>> {
    let existing = Fuel::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Fuel record not found for update".to_string()))?;

    if let Some(vehicle_id) = payload.vehicle_id {
        if vehicle_id != existing.vehicle_id {
            Vehicle::find_by_id(vehicle_id)
                .one(&state.db)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("New vehicle with ID {} not found.", vehicle_id))
                })?;
        }
    }
    if let Some(fuel_type_id) = payload.fuel_type_id {
        if fuel_type_id != existing.fuel_type_id {
            FuelType::find_by_id(fuel_type_id)
                .one(&state.db)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("New fuel type with ID {} not found.", fuel_type_id))
                })?;
        }
    }

    if let Some(quantity) = payload.quantity {
        if quantity <= 0.0 {
            return Err(AppError::BadRequest(
                "Fuel quantity must be greater than zero.".to_string(),
            ));
        }
    }
    if let Some(price) = payload.price_per_liter {
        if price <= 0.0 {
            return Err(AppError::BadRequest(
                "Price per liter must be greater than zero.".to_string(),
            ));
        }
    }

    let effective_quantity = payload.quantity.unwrap_or(existing.quantity);
    let effective_price = payload.price_per_liter.unwrap_or(existing.price_per_liter);
    let recalculate = payload.quantity.is_some() || payload.price_per_liter.is_some();

    let mut fuel_model: fuel::ActiveModel = existing.into();
    if let Some(vehicle_id) = payload.vehicle_id {
        fuel_model.vehicle_id = Set(vehicle_id);
    }
    if let Some(fuel_type_id) = payload.fuel_type_id {
        fuel_model.fuel_type_id = Set(fuel_type_id);
    }
    if let Some(quantity) = payload.quantity {
        fuel_model.quantity = Set(quantity);
    }
    if let Some(price) = payload.price_per_liter {
        fuel_model.price_per_liter = Set(price);
    }
    if recalculate {
        fuel_model.cost = Set(round2(effective_quantity * effective_price));
    }

    let updated = fuel_model.update(&state.db).await?;
    Ok(Json(updated))
}

/// Delete a fuel record (requires fleet.manage)
async fn delete_fuel_record(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
) -> Result<StatusCode> {
    let existing = Fuel::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Fuel record not found for deletion".to_string()))?;

    existing.delete(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Business-rule check before refueling a vehicle.
///
/// A vehicle must be available, and must have completed a trip since its
/// last refueling. Rule failures are a normal 200 response, not an error.
async fn check_eligibility(
    State(state): State<AppState>,
    Path(vehicle_id): Path<i32>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<EligibilityResponse>> {
    let vehicle = Vehicle::find_by_id(vehicle_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vehicle with ID {} not found.", vehicle_id)))?;

    if vehicle.status != "available" {
        return Ok(Json(EligibilityResponse {
            eligible: false,
            message: format!(
                "Vehicle is not eligible for fueling. Its current status is '{}'.",
                vehicle.status
            ),
        }));
    }

    let last_fuel = Fuel::find()
        .filter(fuel::Column::VehicleId.eq(vehicle_id))
        .order_by_desc(fuel::Column::CreatedAt)
        .one(&state.db)
        .await?;

    if let Some(last_fuel) = last_fuel {
        let completed_since = Trip::find()
            .filter(trip::Column::VehicleId.eq(vehicle_id))
            .filter(trip::Column::Status.eq("completed"))
            .filter(trip::Column::EndTime.gt(last_fuel.created_at))
            .one(&state.db)
            .await?;

        if completed_since.is_none() {
            return Ok(Json(EligibilityResponse {
                eligible: false,
                message: format!(
                    "A completed trip is required since the last refueling on {}",
                    last_fuel.created_at.format("%Y-%m-%d %H:%M")
                ),
            }));
        }
    }

    Ok(Json(EligibilityResponse {
        eligible: true,
        message: "Vehicle is eligible for fueling.".to_string(),
    }))
}
