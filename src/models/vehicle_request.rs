use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle of a vehicle request.
///
/// The value stored on the request row is a projection of the approval log:
/// it is only ever written together with a new `request_approval` row, inside
/// the same transaction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved_by_chef")]
    ApprovedByChef,
    #[sea_orm(string_value = "approved_by_logistic")]
    ApprovedByLogistic,
    #[sea_orm(string_value = "fully_approved")]
    FullyApproved,
    #[sea_orm(string_value = "denied")]
    Denied,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vehicle_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub purpose: String,
    pub from_location: String,
    pub to_location: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub roadmap: Option<String>,
    pub departure_time: DateTimeUtc,
    pub return_time: DateTimeUtc,
    pub status: RequestStatus,
    pub created_at: DateTimeUtc,
    pub requester_id: Option<i32>,
    pub vehicle_id: Option<i32>,
    /// Assigned driver; references `user` (driver-role accounts), not the
    /// trip roster table.
    pub driver_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RequesterId",
        to = "super::user::Column::Id"
    )]
    Requester,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::DriverId",
        to = "super::user::Column::Id"
    )]
    Driver,
    #[sea_orm(
        belongs_to = "super::vehicle::Entity",
        from = "Column::VehicleId",
        to = "super::vehicle::Column::Id"
    )]
    Vehicle,
    #[sea_orm(has_many = "super::request_approval::Entity")]
    Approvals,
}

impl Related<super::request_approval::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Approvals.def()
    }
}

impl Related<super::vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicle.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
