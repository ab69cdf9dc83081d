use sea_orm::EntityTrait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::user;
use crate::state::DbConn;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoleInfo {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub id: i32,
    pub name: String,
}

/// Full user representation returned by the users API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserOut {
    pub id: i32,
    pub matricule: String,
    pub first_name: String,
    pub last_name: String,
    pub telephone: String,
    pub email: String,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub role: Option<RoleInfo>,
    pub service: Option<ServiceInfo>,
}

impl UserOut {
    /// Assemble the response for an already-loaded user row.
    pub async fn from_model(db: &DbConn, user_row: user::Model) -> Result<Self> {
        let role = Role::find_by_id(user_row.role_id).one(db).await?;
        let service = match user_row.service_id {
            Some(service_id) => Service::find_by_id(service_id).one(db).await?,
            None => None,
        };

        Ok(Self {
            id: user_row.id,
            matricule: user_row.matricule,
            first_name: user_row.first_name,
            last_name: user_row.last_name,
            telephone: user_row.telephone,
            email: user_row.email,
            status: user_row.status,
            created_at: user_row.created_at,
            role: role.map(|r| RoleInfo {
                id: r.id,
                name: r.name,
                description: r.description,
            }),
            service: service.map(|s| ServiceInfo {
                id: s.id,
                name: s.name,
            }),
        })
    }

    /// Fetch a user by id and assemble the response; NotFound if absent.
    pub async fn load(db: &DbConn, user_id: i32) -> Result<Self> {
        let user_row = User::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id: {} was not found.", user_id)))?;
        Self::from_model(db, user_row).await
    }
}
