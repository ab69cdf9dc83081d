use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
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
use crate::models::driver;
use crate::models::prelude::*;
use crate::state::AppState;

/// Create driver roster routes
pub fn drivers_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_drivers).post(create_driver))
        .route(
            "/{id}",
            get(get_driver).put(update_driver).delete(delete_driver),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DriverPayload {
    pub first_name: String,
    pub last_name: String,
    pub cni_number: String,
    pub email: String,
    pub matricule: String,
}

#[derive(Debug, Deserialize)]
pub struct DriverUpdatePayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub cni_number: Option<String>,
    pub email: Option<String>,
    pub matricule: Option<String>,
}

async fn check_unique_fields(
    state: &AppState,
    exclude_id: Option<i32>,
    cni_number: Option<&str>,
    email: Option<&str>,
    matricule: Option<&str>,
) -> Result<()> {
    if cni_number.is_none() && email.is_none() && matricule.is_none() {
        return Ok(());
    }

    let mut query = Driver::find();
    if let Some(id) = exclude_id {
        query = query.filter(driver::Column::Id.ne(id));
    }

    let mut condition = sea_orm::Condition::any();
    if let Some(cni) = cni_number {
        condition = condition.add(driver::Column::CniNumber.eq(cni));
    }
    if let Some(email) = email {
        condition = condition.add(driver::Column::Email.eq(email));
    }
    if let Some(matricule) = matricule {
        condition = condition.add(driver::Column::Matricule.eq(matricule));
    }

    let existing = query.filter(condition).one(&state.db).await?;
    if let Some(existing) = existing {
        if cni_number == Some(existing.cni_number.as_str()) {
            return Err(AppError::Conflict("CNI number already exists".to_string()));
        }
        if email == Some(existing.email.as_str()) {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        return Err(AppError::Conflict("Matricule already exists".to_string()));
    }

    Ok(())
}

async fn list_drivers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<Vec<driver::Model>>> {
    let mut query = Driver::find();

    if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(
            driver::Column::FirstName
                .contains(search)
                .or(driver::Column::LastName.contains(search))
                .or(driver::Column::Matricule.contains(search)),
        );
    }

    let drivers = query
        .order_by_asc(driver::Column::LastName)
        .offset(params.skip.unwrap_or(0))
        .limit(params.limit.unwrap_or(100))
        .all(&state.db)
        .await?;

    Ok(Json(drivers))
}

async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authenticated(_actor): Authenticated,
) -> Result<Json<driver::Model>> {
    let found = Driver::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Driver with id: {} not found.", id)))?;
    Ok(Json(found))
}

async fn create_driver(
    State(state): State<AppState>,
    Authorized(_actor, _): Authorized<FleetManage>,
    Json(payload): Json<DriverPayload>,
) -> Result<(StatusCode, Json<driver::Model>)> {
    check_unique_fields(
        &state,
        None,
        Some(&payload.cni_number),
        Some(&payload.email),
        Some(&payload.matricule),
    )
    .await?;

    let new_driver = driver::ActiveModel {
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        cni_number: Set(payload.cni_number),
        email: Set(payload.email),
        matricule: Set(payload.matricule),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = new_driver.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_driver(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
    Json(payload): Json<DriverUpdatePayload>,
) -> Result<Json<driver::Model>> {
    let existing = Driver::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Driver with id: {} not found.", id)))?;

    check_unique_fields(
        &state,
        Some(id),
        payload.cni_number.as_deref(),
        payload.email.as_deref(),
        payload.matricule.as_deref(),
    )
    .await?;

    let mut driver_model: driver::ActiveModel = existing.into();
    if let Some(first_name) = payload.first_name {
        driver_model.first_name = Set(first_name);
    }
    if let Some(last_name) = payload.last_name {
        driver_model.last_name = Set(last_name);
    }
    if let Some(cni_number) = payload.cni_number {
        driver_model.cni_number = Set(cni_number);
    }
    if let Some(email) = payload.email {
        driver_model.email = Set(email);
    }
    if let Some(matricule) = payload.matricule {
        driver_model.matricule = Set(matricule);
    }

    let updated = driver_model.update(&state.db).await?;
    Ok(Json(updated))
}

async fn delete_driver(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Authorized(_actor, _): Authorized<FleetManage>,
) -> Result<StatusCode> {
    let existing = Driver::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Driver with id: {} not found.", id)))?;

    existing.delete(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}
