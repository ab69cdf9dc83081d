//! Name-only lookup tables behind a shared CRUD surface
//!
//! One macro invocation per table; the original system had a separate,
//! near-identical router for each of these.

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
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LookupPayload {
    pub name: String,
}

/// Macro to define a lookup router module
///
/// Reads are open to any authenticated user; mutations require fleet.manage.
/// Duplicate names conflict.
macro_rules! lookup_routes {
    ($(#[$meta:meta])* $mod_name:ident, $model_mod:ident, $label:expr) => {
        $(#[$meta])*
        pub mod $mod_name {
            use super::*;
            use crate::models::$model_mod as lookup;

            pub fn routes(state: AppState) -> Router {
                Router::new()
                    .route("/", get(list).post(create))
                    .route("/{id}", get(get_one).put(update).delete(delete_one))
                    .with_state(state)
            }

            async fn list(
                State(state): State<AppState>,
                Authenticated(_actor): Authenticated,
            ) -> Result<Json<Vec<lookup::Model>>> {
                let items = lookup::Entity::find()
                    .order_by_asc(lookup::Column::Name)
                    .all(&state.db)
                    .await?;
                Ok(Json(items))
            }

            async fn get_one(
                State(state): State<AppState>,
                Path(id): Path<i32>,
                Authenticated(_actor): Authenticated,
            ) -> Result<Json<lookup::Model>> {
                let found = lookup::Entity::find_by_id(id)
                    .one(&state.db)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("{} with id: {} not found.", $label, id))
                    })?;
                Ok(Json(found))
            }

            async fn create(
                State(state): State<AppState>,
                Authorized(_actor, _): Authorized<FleetManage>,
                Json(payload): Json<LookupPayload>,
            ) -> Result<(StatusCode, Json<lookup::Model>)> {
                let existing = lookup::Entity::find()
                    .filter(lookup::Column::Name.eq(&payload.name))
                    .one(&state.db)
                    .await?;
                if existing.is_some() {
                    return Err(AppError::Conflict(format!(
                        "{} with name '{}' already exists.",
                        $label, payload.name
                    )));
                }

                let new_item = lookup::ActiveModel {
                    name: Set(payload.name),
                    ..Default::default()
                };
                let created = new_item.insert(&state.db).await?;
                Ok((StatusCode::CREATED, Json(created)))
            }

            async fn update(
                State(state): State<AppState>,
                Path(id): Path<i32>,
                Authorized(_actor, _): Authorized<FleetManage>,
                Json(payload): Json<LookupPayload>,
            ) -> Result<Json<lookup::Model>> {
                let existing = lookup::Entity::find_by_id(id)
                    .one(&state.db)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("{} with id: {} not found.", $label, id))
                    })?;

                let taken = lookup::Entity::find()
                    .filter(lookup::Column::Name.eq(&payload.name))
                    .filter(lookup::Column::Id.ne(id))
                    .one(&state.db)
                    .await?;
                if taken.is_some() {
                    return Err(AppError::Conflict(format!(
                        "{} with name '{}' already exists.",
                        $label, payload.name
                    )));
                }

                let mut model: lookup::ActiveModel = existing.into();
                model.name = Set(payload.name);
                let updated = model.update(&state.db).await?;
                Ok(Json(updated))
            }

            async fn delete_one(
                State(state): State<AppState>,
                Path(id): Path<i32>,
                Authorized(_actor, _): Authorized<FleetManage>,
            ) -> Result<StatusCode> {
                let existing = lookup::Entity::find_by_id(id)
                    .one(&state.db)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("{} with id: {} not found.", $label, id))
                    })?;

                existing.delete(&state.db).await?;

                Ok(StatusCode::NO_CONTENT)
            }
        }
    };
}

lookup_routes!(
    /// Departments ("services") that users belong to
    services,
    service,
    "Service"
);
lookup_routes!(garages, garage, "Garage");
lookup_routes!(fuel_types, fuel_type, "Fuel type");
lookup_routes!(vehicle_makes, vehicle_make, "Vehicle make");
lookup_routes!(vehicle_models, vehicle_model, "Vehicle model");
lookup_routes!(vehicle_types, vehicle_type, "Vehicle type");
lookup_routes!(vehicle_transmissions, vehicle_transmission, "Vehicle transmission");
lookup_routes!(maintenance_categories, category_maintenance, "Maintenance category");
lookup_routes!(panne_categories, category_panne, "Panne category");
