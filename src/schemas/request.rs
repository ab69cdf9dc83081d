use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::request_approval::{self, ApprovalDecision};
use crate::models::user;
use crate::models::vehicle_request::{self, RequestStatus};
use crate::schemas::user::ServiceInfo;
use crate::state::DbConn;

type DateTimeUtc = chrono::DateTime<chrono::Utc>;

/// Requester/approver identity nested in request responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestUserBrief {
    pub id: i32,
    pub matricule: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub service: Option<ServiceInfo>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestVehicleBrief {
    pub id: i32,
    pub plate_number: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApprovalOut {
    pub id: i32,
    pub approval_step: i32,
    pub status: ApprovalDecision,
    pub comments: Option<String>,
    pub updated_at: DateTimeUtc,
    pub approver: Option<RequestUserBrief>,
}

/// Vehicle request with its requester, assignment and approval log
#[derive(Debug, Clone, Serialize)]
pub struct VehicleRequestOut {
    pub id: i32,
    pub purpose: String,
    pub from_location: String,
    pub to_location: String,
    pub roadmap: Option<String>,
    pub departure_time: DateTimeUtc,
    pub return_time: DateTimeUtc,
    pub status: RequestStatus,
    pub created_at: DateTimeUtc,
    pub requester: Option<RequestUserBrief>,
    pub vehicle: Option<RequestVehicleBrief>,
    pub driver: Option<RequestUserBrief>,
    pub approvals: Vec<ApprovalOut>,
}

async fn user_brief(db: &DbConn, user_id: i32) -> Result<Option<RequestUserBrief>> {
    let Some(user_row) = User::find_by_id(user_id).one(db).await? else {
        return Ok(None);
    };
    let service = match user_row.service_id {
        Some(service_id) => Service::find_by_id(service_id).one(db).await?,
        None => None,
    };
    Ok(Some(brief_from(user_row, service.map(|s| ServiceInfo {
        id: s.id,
        name: s.name,
    }))))
}

fn brief_from(user_row: user::Model, service: Option<ServiceInfo>) -> RequestUserBrief {
    RequestUserBrief {
        id: user_row.id,
        matricule: user_row.matricule,
        first_name: user_row.first_name,
        last_name: user_row.last_name,
        email: user_row.email,
        service,
    }
}

impl VehicleRequestOut {
    /// Assemble the nested response for an already-loaded request row.
    pub async fn from_model(db: &DbConn, request: vehicle_request::Model) -> Result<Self> {
        let requester = match request.requester_id {
            Some(id) => user_brief(db, id).await?,
            None => None,
        };
        let driver = match request.driver_id {
            Some(id) => user_brief(db, id).await?,
            None => None,
        };
        let vehicle = match request.vehicle_id {
            Some(id) => Vehicle::find_by_id(id).one(db).await?.map(|v| {
                RequestVehicleBrief {
                    id: v.id,
                    plate_number: v.plate_number,
                    status: v.status,
                }
            }),
            None => None,
        };

        let approval_rows = RequestApproval::find()
            .filter(request_approval::Column::RequestId.eq(request.id))
            .order_by_asc(request_approval::Column::ApprovalStep)
            .all(db)
            .await?;

        let mut approvals = Vec::with_capacity(approval_rows.len());
        for a in approval_rows {
            let approver = match a.approver_id {
                Some(id) => user_brief(db, id).await?,
                None => None,
            };
            approvals.push(ApprovalOut {
                id: a.id,
                approval_step: a.approval_step,
                status: a.status,
                comments: a.comments,
                updated_at: a.updated_at,
                approver,
            });
        }

        Ok(Self {
            id: request.id,
            purpose: request.purpose,
            from_location: request.from_location,
            to_location: request.to_location,
            roadmap: request.roadmap,
            departure_time: request.departure_time,
            return_time: request.return_time,
            status: request.status,
            created_at: request.created_at,
            requester,
            vehicle,
            driver,
            approvals,
        })
    }

    /// Fetch a request by id and assemble the response; NotFound if absent.
    pub async fn load(db: &DbConn, request_id: i32) -> Result<Self> {
        let request = VehicleRequest::find_by_id(request_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Request with id: {} not found.", request_id))
            })?;
        Self::from_model(db, request).await
    }
}
