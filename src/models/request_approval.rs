use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Outcome recorded for one approval step.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "denied")]
    Denied,
}

/// One row per (request, approval step). The schema enforces a unique index
/// on (request_id, approval_step): a step is decided exactly once, and the
/// constraint violation is the conflict signal under concurrent submission.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "request_approvals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub request_id: i32,
    /// 1 = chef, 2 = logistic, 3 = charoi/admin.
    pub approval_step: i32,
    pub status: ApprovalDecision,
    #[sea_orm(column_type = "Text", nullable)]
    pub comments: Option<String>,
    pub approver_id: Option<i32>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vehicle_request::Entity",
        from = "Column::RequestId",
        to = "super::vehicle_request::Column::Id"
    )]
    Request,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ApproverId",
        to = "super::user::Column::Id"
    )]
    Approver,
}

impl Related<super::vehicle_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Request.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Approver.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
