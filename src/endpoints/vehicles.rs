use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::{Authenticated, Authorized, FleetManage};
use crate::models::prelude::*;
use crate::models::vehicle;
use crate::state::AppState;

/// Create vehicle routes
pub fn vehicles_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route(
            "/{id}",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
        .route("/{id}/status", patch(update_vehicle_status))
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VehiclePayload {
    pub make_id: Option<i32>,
    pub model_id: Option<i32>,
    pub year: Option<i32>,
    pub plate_number: String,
    #[serde(default)]
    pub mileage: f64,
    #[serde(default)]
    pub engine_size: f64,
    pub vehicle_type_id: Option<i32>,
    pub transmission_id: Option<i32>,
    pub fuel_type_id: Option<i32>,
    pub vin: String,
    pub color: String,
    #[serde(default)]
    pub purchase_price: f64,
    pub purchase_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct VehicleStatusPayload {
    pub status: String,
}

const VEHICLE_STATUSES: [&str; 5] = ["available", "in_use", "in_repair", "decommissioned", "sold"];

// ============================================================================
// Helpers
// ============================================================================

/// Validate that the lookup references on a payload exist.
async fn check_lookup_refs(state: &AppState, payload: &VehiclePayload) -> Result<()> {
    if let Some(make_id) = payload.make_id {
        VehicleMake::find_by_id(make_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle make with id {} not found.", make_id)))?;
    }
    if let Some(model_id) = payload.model_id {
        VehicleModel::find_by_id(model_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Vehicle model with id {} not found.", model_id))
            })?;
    }
    if let Some(type_id) = payload.vehicle_type_id {
        VehicleType::find_by_id(type_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Vehicle type with id {} not found.", type_id))
            })?;
    }
    if let Some(transmission_id) = payload.transmission_id {
        VehicleTransmission::find_by_id(transmission_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Vehicle transmission with id {} not found.",
                    transmission_id
                ))
            })?;
    }
    if let Some(fuel_type_id) = payload.fuel_type_id {
        FuelType::find_by_id(fuel_type_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Fuel type with id {} not found.", fuel_type_id))
            })?;
    }
    Ok(())
}

/// Reject duplicate plate numbers and VINs with a field-specific message.
async fn check_unique_plate_and_vin(
    state: &AppState,
    exclude_id: Option<i32>,
    plate_number: &str,
    vin: &str,
) -> Result<()> {
    let mut query = Vehicle::find().filter(
        vehicle::Column::PlateNumber
            .eq(plate_number)
            .or(vehicle::Column::Vin.eq(vin)),
    );
    if let Some(id) = exclude_id {
        query = query.filter(vehicle::Column::Id.ne(id));
    }

    if let Some(existing) = query.one(&state.db).await? {
        if existing.plate_number == plate_number {
            return Err(AppError::Conflict(format!(
                "Vehicle with plate number '{}' already exists.",
                plate_number
            )));
        }
        return Err(AppError::Conflict(format!(
            "Vehicle with VIN '{}' already exists.",
            vin
        )));
    }

    Ok(())
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// List vehicles with optional plate search (any authenticated user)
async fn list_vehicles(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<Vec<vehicle::Model>>> {
    let mut query = Vehicle::find();

    if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(vehicle::Column::PlateNumber.contains(search));
    }

    let vehicles = query
        .order_by_asc(vehicle::Column::Id)
        .offset(params.skip.unwrap_or(0))
        .limit(params.limit.unwrap_or(100))
        .all(&state.db)
        .await?;

    Ok(Json(vehicles))
}

/// Get a single vehicle (any authenticated user)
async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<vehicle::Model>> {
    let found = Vehicle::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vehicle with id: {} not found.", id)))?;
    Ok(Json(found))
}

/// Create a vehicle (requires fleet.manage)
async fn create_vehicle(
    State(state): State<AppState>,
    Authorized(_actor, _): Authorized<FleetManage>,
    Json(payload): Json<VehiclePayload>,
) -> Result<(StatusCode, Json<vehicle::Model>)> {
    check_unique_plate_and_vin(&state, None, &payload.plate_number, &payload.vin).await?;
    check_lookup_refs(&state, &payload).await?;

    let new_vehicle = vehicle::ActiveModel {
        make_id: Set(payload.make_id),
        model_id: Set(payload.model_id),
        year: Set(payload.year),
        plate_number: Set(payload.plate_number),
        mileage: Set(payload.mileage),
        engine_size: Set(payload.engine_size),
        vehicle_type_id: Set(payload.vehicle_type_id),
        transmission_id: Set(payload.transmission_id),
        fuel_type_id: Set(payload.fuel_type_id),
        vin: Set(payload.vin),
        color: Set(payload.color),
        purchase_price: Set(payload.purchase_price),
        purchase_date: Set(payload.purchase_date),
        status: Set("available".to_string()),
        registration_date: Set(Utc::now()),
        ..Default::default()
    };

    let created = new_vehicle.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Full update of a vehicle (requires fleet.manage)
async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
    Json(payload): Json<VehiclePayload>,
) -> Result<Json<vehicle::Model>> {
    let existing = Vehicle::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vehicle with id: {} not found", id)))?;

    check_unique_plate_and_vin(&state, Some(id), &payload.plate_number, &payload.vin).await?;
    check_lookup_refs(&state, &payload).await?;

    let mut vehicle_model: vehicle::ActiveModel = existing.into();
    vehicle_model.make_id = Set(payload.make_id);
    vehicle_model.model_id = Set(payload.model_id);
    vehicle_model.year = Set(payload.year);
    vehicle_model.plate_number = Set(payload.plate_number);
    vehicle_model.mileage = Set(payload.mileage);
    vehicle_model.engine_size = Set(payload.engine_size);
    vehicle_model.vehicle_type_id = Set(payload.vehicle_type_id);
    vehicle_model.transmission_id = Set(payload.transmission_id);
    vehicle_model.fuel_type_id = Set(payload.fuel_type_id);
    vehicle_model.vin = Set(payload.vin);
    vehicle_model.color = Set(payload.color);
    vehicle_model.purchase_price = Set(payload.purchase_price);
    vehicle_model.purchase_date = Set(payload.purchase_date);

    let updated = vehicle_model.update(&state.db).await?;
    Ok(Json(updated))
}

/// Update only the status of a vehicle (requires fleet.manage)
async fn update_vehicle_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
    Json(payload): Json<VehicleStatusPayload>,
) -> Result<Json<vehicle::Model>> {
    if !VEHICLE_STATUSES.contains(&payload.status.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Invalid vehicle status '{}'.",
            payload.status
        )));
    }

    let existing = Vehicle::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vehicle with id: {} not found", id)))?;

    let mut vehicle_model: vehicle::ActiveModel = existing.into();
    vehicle_model.status = Set(payload.status);

    let updated = vehicle_model.update(&state.db).await?;
    Ok(Json(updated))
}

/// Delete a vehicle (requires fleet.manage)
async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
) -> Result<StatusCode> {
    let existing = Vehicle::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vehicle with id: {} not found", id)))?;

    existing.delete(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}
