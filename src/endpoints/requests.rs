use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::{Authenticated, Authorized, RequestsAssign, RequestsReview, RoleKind};
use crate::models::prelude::*;
use crate::models::vehicle_request::{self, RequestStatus};
use crate::models::user;
use crate::schemas::request::VehicleRequestOut;
use crate::state::AppState;

/// Create vehicle request routes
pub fn requests_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_request).get(list_requests))
        .route("/my-requests", get(my_requests))
        .route("/count/pending", get(pending_count))
        .route("/{id}", get(get_request).delete(delete_request))
        .route("/{id}/assign", put(assign_request))
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRequestPayload {
    pub purpose: String,
    pub from_location: String,
    pub to_location: String,
    pub roadmap: Option<String>,
    pub departure_time: chrono::DateTime<chrono::Utc>,
    pub return_time: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AssignmentPayload {
    pub vehicle_id: Option<i32>,
    pub driver_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct PendingCount {
    pub count: u64,
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// Create a new vehicle request owned by the caller, always pending.
async fn create_request(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Json(payload): Json<CreateRequestPayload>,
) -> Result<(StatusCode, Json<VehicleRequestOut>)> {
    if payload.return_time <= payload.departure_time {
        return Err(AppError::BadRequest(
            "Return time must be after departure time.".to_string(),
        ));
    }

    let new_request = vehicle_request::ActiveModel {
        purpose: Set(payload.purpose),
        from_location: Set(payload.from_location),
        to_location: Set(payload.to_location),
        roadmap: Set(payload.roadmap),
        departure_time: Set(payload.departure_time),
        return_time: Set(payload.return_time),
        status: Set(RequestStatus::Pending),
        created_at: Set(Utc::now()),
        requester_id: Set(Some(actor.user.id)),
        vehicle_id: Set(None),
        driver_id: Set(None),
        ..Default::default()
    };

    let created = new_request.insert(&state.db).await?;
    let response = VehicleRequestOut::from_model(&state.db, created).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// List requests with role-dependent visibility:
/// admins see everything, a chef sees their own department, logistic and
/// charoi see the queue waiting on their step.
async fn list_requests(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    Authorized(actor, _): Authorized<RequestsReview>,
) -> Result<Json<Vec<VehicleRequestOut>>> {
    let skip = params.skip.unwrap_or(0);
    let limit = params.limit.unwrap_or(100);

    let mut query = VehicleRequest::find();

    match actor.role {
        RoleKind::Chef => {
            let Some(service_id) = actor.user.service_id else {
                // A chef with no department sees no requests.
                return Ok(Json(Vec::new()));
            };
            query = query
                .join(JoinType::InnerJoin, vehicle_request::Relation::Requester.def())
                .filter(user::Column::ServiceId.eq(service_id));
        }
        RoleKind::Logistic => {
            query = query.filter(vehicle_request::Column::Status.eq(RequestStatus::ApprovedByChef));
        }
        RoleKind::Charoi => {
            query = query
                .filter(vehicle_request::Column::Status.eq(RequestStatus::ApprovedByLogistic));
        }
        // Admin and superadmin see all requests, unfiltered.
        _ => {}
    }

    let rows = query
        .order_by_desc(vehicle_request::Column::CreatedAt)
        .offset(skip)
        .limit(limit)
        .all(&state.db)
        .await?;

    let mut responses = Vec::with_capacity(rows.len());
    for row in rows {
        responses.push(VehicleRequestOut::from_model(&state.db, row).await?);
    }

    Ok(Json(responses))
}

/// List the caller's own requests, any status.
async fn my_requests(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    Authenticated(actor): Authenticated,
) -> Result<Json<Vec<VehicleRequestOut>>> {
    let skip = params.skip.unwrap_or(0);
    let limit = params.limit.unwrap_or(50);

    let rows = VehicleRequest::find()
        .filter(vehicle_request::Column::RequesterId.eq(actor.user.id))
        .order_by_desc(vehicle_request::Column::CreatedAt)
        .offset(skip)
        .limit(limit)
        .all(&state.db)
        .await?;

    let mut responses = Vec::with_capacity(rows.len());
    for row in rows {
        responses.push(VehicleRequestOut::from_model(&state.db, row).await?);
    }

    Ok(Json(responses))
}

/// Fetch a single request; visible to privileged reviewers, the owner, and
/// a chef from the requester's department.
async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authenticated(actor): Authenticated,
) -> Result<Json<VehicleRequestOut>> {
    let request = VehicleRequest::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request with id: {} not found.", id)))?;

    let is_privileged = matches!(
        actor.role,
        RoleKind::Admin | RoleKind::Superadmin | RoleKind::Logistic | RoleKind::Charoi
    );
    let is_owner = request.requester_id == Some(actor.user.id);

    let is_chef_with_same_service = if actor.role == RoleKind::Chef {
        match (actor.user.service_id, request.requester_id) {
            (Some(chef_service), Some(requester_id)) => User::find_by_id(requester_id)
                .one(&state.db)
                .await?
                .map(|u| u.service_id == Some(chef_service))
                .unwrap_or(false),
            _ => false,
        }
    } else {
        false
    };

    if !(is_privileged || is_owner || is_chef_with_same_service) {
        return Err(AppError::Forbidden(
            "Not authorized to view this request.".to_string(),
        ));
    }

    let response = VehicleRequestOut::from_model(&state.db, request).await?;
    Ok(Json(response))
}

/// Assign a vehicle and/or driver to a request.
async fn assign_request(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<RequestsAssign>,
    Json(payload): Json<AssignmentPayload>,
) -> Result<Json<VehicleRequestOut>> {
    let request = VehicleRequest::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request with id: {} not found.", id)))?;

    if let Some(vehicle_id) = payload.vehicle_id {
        Vehicle::find_by_id(vehicle_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Vehicle with id {} not found.", vehicle_id))
            })?;
    }
    if let Some(driver_id) = payload.driver_id {
        User::find_by_id(driver_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found.", driver_id)))?;
    }

    let mut request_model: vehicle_request::ActiveModel = request.into();
    if payload.vehicle_id.is_some() {
        request_model.vehicle_id = Set(payload.vehicle_id);
    }
    if payload.driver_id.is_some() {
        request_model.driver_id = Set(payload.driver_id);
    }
    let updated = request_model.update(&state.db).await?;

    let response = VehicleRequestOut::from_model(&state.db, updated).await?;
    Ok(Json(response))
}

/// Delete a request. Admins always may; the owner only while it is pending.
async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authenticated(actor): Authenticated,
) -> Result<StatusCode> {
    let request = VehicleRequest::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request with id: {} not found.", id)))?;

    let is_owner = request.requester_id == Some(actor.user.id);
    let is_pending = request.status == RequestStatus::Pending;

    if actor.role.is_admin() || (is_owner && is_pending) {
        request.delete(&state.db).await?;
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Forbidden(
            "Not authorized to delete this request".to_string(),
        ))
    }
}

/// Count of requests still waiting on their first approval.
async fn pending_count(
    State(state): State<AppState>,
    Authorized(_actor, _): Authorized<RequestsAssign>,
) -> Result<Json<PendingCount>> {
    let count = VehicleRequest::find()
        .filter(vehicle_request::Column::Status.eq(RequestStatus::Pending))
        .count(&state.db)
        .await?;

    Ok(Json(PendingCount { count }))
}
