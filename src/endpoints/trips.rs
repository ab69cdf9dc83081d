use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::{Authenticated, Authorized, FleetManage};
use crate::models::prelude::*;
use crate::models::{driver, trip, vehicle};
use crate::state::AppState;

/// Create trip routes
pub fn trips_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_trips).post(create_trip))
        .route("/{id}", get(get_trip).put(update_trip).delete(delete_trip))
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TripCreatePayload {
    pub vehicle_id: i32,
    pub driver_id: i32,
    pub start_location: String,
    pub end_location: String,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
    pub purpose: Option<String>,
    pub notes: Option<String>,
    #[serde(default = "default_trip_status")]
    pub status: String,
}

fn default_trip_status() -> String {
    "planned".to_string()
}

#[derive(Debug, Deserialize)]
pub struct TripUpdatePayload {
    pub vehicle_id: Option<i32>,
    pub driver_id: Option<i32>,
    pub start_location: Option<String>,
    pub end_location: Option<String>,
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
    pub purpose: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TripListParams {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub vehicle_id: Option<i32>,
    pub driver_id: Option<i32>,
    pub start_date_after: Option<NaiveDate>,
    pub start_date_before: Option<NaiveDate>,
}

// ============================================================================
// Helpers
// ============================================================================

/// Detect a scheduling overlap for the vehicle or driver in the window.
async fn has_overlap(
    state: &AppState,
    exclude_trip_id: Option<i32>,
    vehicle_id: i32,
    driver_id: i32,
    start_time: chrono::DateTime<chrono::Utc>,
    end_time: chrono::DateTime<chrono::Utc>,
) -> Result<bool> {
    let mut query = Trip::find()
        .filter(
            trip::Column::VehicleId
                .eq(vehicle_id)
                .or(trip::Column::DriverId.eq(driver_id)),
        )
        .filter(trip::Column::EndTime.gt(start_time))
        .filter(trip::Column::StartTime.lt(end_time));

    if let Some(id) = exclude_trip_id {
        query = query.filter(trip::Column::Id.ne(id));
    }

    Ok(query.one(&state.db).await?.is_some())
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// Schedule a trip; conflicts when the vehicle or driver is already booked.
async fn create_trip(
    State(state): State<AppState>,
    Authenticated(_actor): Authenticated,
    Json(payload): Json<TripCreatePayload>,
) -> Result<(StatusCode, Json<trip::Model>)> {
    Vehicle::find_by_id(payload.vehicle_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Vehicle with ID {} not found.", payload.vehicle_id))
        })?;

    Driver::find_by_id(payload.driver_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Driver with ID {} not found.", payload.driver_id))
        })?;

    if let Some(end_time) = payload.end_time {
        if end_time <= payload.start_time {
            return Err(AppError::BadRequest(
                "End time must be after start time.".to_string(),
            ));
        }
        if has_overlap(
            &state,
            None,
            payload.vehicle_id,
            payload.driver_id,
            payload.start_time,
            end_time,
        )
        .await?
        {
            return Err(AppError::Conflict(
                "Vehicle or driver has an overlapping trip scheduled for the given time."
                    .to_string(),
            ));
        }
    }

    let new_trip = trip::ActiveModel {
        vehicle_id: Set(payload.vehicle_id),
        driver_id: Set(payload.driver_id),
        start_location: Set(payload.start_location),
        end_location: Set(payload.end_location),
        start_time: Set(payload.start_time),
        end_time: Set(payload.end_time),
        purpose: Set(payload.purpose),
        notes: Set(payload.notes),
        status: Set(payload.status),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };

    let created = new_trip.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<trip::Model>> {
    let found = Trip::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;
    Ok(Json(found))
}

/// List trips with search and filters
async fn list_trips(
    State(state): State<AppState>,
    Query(params): Query<TripListParams>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<Vec<trip::Model>>> {
    let mut query = Trip::find();

    if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
        query = query
            .join(JoinType::LeftJoin, trip::Relation::Vehicle.def())
            .join(JoinType::LeftJoin, trip::Relation::Driver.def())
            .filter(
                Condition::any()
                    .add(trip::Column::StartLocation.contains(search))
                    .add(trip::Column::EndLocation.contains(search))
                    .add(trip::Column::Purpose.contains(search))
                    .add(trip::Column::Notes.contains(search))
                    .add(vehicle::Column::PlateNumber.contains(search))
                    .add(driver::Column::FirstName.contains(search))
                    .add(driver::Column::LastName.contains(search)),
            );
    }

    if let Some(status) = &params.status {
        query = query.filter(trip::Column::Status.eq(status.clone()));
    }
    if let Some(vehicle_id) = params.vehicle_id {
        query = query.filter(trip::Column::VehicleId.eq(vehicle_id));
    }
    if let Some(driver_id) = params.driver_id {
        query = query.filter(trip::Column::DriverId.eq(driver_id));
    }
    if let Some(after) = params.start_date_after {
        query = query.filter(trip::Column::StartTime.gte(after.and_time(NaiveTime::MIN).and_utc()));
    }
    if let Some(before) = params.start_date_before {
        let next_day = before
            .checked_add_days(chrono::Days::new(1))
            .unwrap_or(before);
        query = query.filter(trip::Column::StartTime.lt(next_day.and_time(NaiveTime::MIN).and_utc()));
    }

    let trips = query
        .order_by_desc(trip::Column::StartTime)
        .offset(params.skip.unwrap_or(0))
        .limit(params.limit.unwrap_or(100))
        .all(&state.db)
        .await?;

    Ok(Json(trips))
}

/// Update a trip (requires fleet.manage); re-checks references and overlap.
async fn update_trip(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
    Json(payload): Json<TripUpdatePayload>,
) -> Result<Json<trip::Model>> {
    let existing = Trip::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found for update".to_string()))?;

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
    if let Some(driver_id) = payload.driver_id {
        if driver_id != existing.driver_id {
            Driver::find_by_id(driver_id)
                .one(&state.db)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("New driver with ID {} not found.", driver_id))
                })?;
        }
    }

    let check_vehicle = payload.vehicle_id.unwrap_or(existing.vehicle_id);
    let check_driver = payload.driver_id.unwrap_or(existing.driver_id);
    let check_start = payload.start_time.unwrap_or(existing.start_time);
    let check_end = payload.end_time.or(existing.end_time);

    if let Some(check_end) = check_end {
        if has_overlap(&state, Some(id), check_vehicle, check_driver, check_start, check_end)
            .await?
        {
            return Err(AppError::Conflict(
                "The updated trip details would cause an overlap with another trip.".to_string(),
            ));
        }
    }

    let mut trip_model: trip::ActiveModel = existing.into();
    if let Some(vehicle_id) = payload.vehicle_id {
        trip_model.vehicle_id = Set(vehicle_id);
    }
    if let Some(driver_id) = payload.driver_id {
        trip_model.driver_id = Set(driver_id);
    }
    if let Some(start_location) = payload.start_location {
        trip_model.start_location = Set(start_location);
    }
    if let Some(end_location) = payload.end_location {
        trip_model.end_location = Set(end_location);
    }
    if let Some(start_time) = payload.start_time {
        trip_model.start_time = Set(start_time);
    }
    if payload.end_time.is_some() {
        trip_model.end_time = Set(payload.end_time);
    }
    if payload.purpose.is_some() {
        trip_model.purpose = Set(payload.purpose);
    }
    if payload.notes.is_some() {
        trip_model.notes = Set(payload.notes);
    }
    if let Some(status) = payload.status {
        trip_model.status = Set(status);
    }
    trip_model.updated_at = Set(Some(Utc::now()));

    let updated = trip_model.update(&state.db).await?;
    Ok(Json(updated))
}

/// Delete a trip (requires fleet.manage)
async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
) -> Result<StatusCode> {
    let existing = Trip::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found for deletion".to_string()))?;

    existing.delete(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}
