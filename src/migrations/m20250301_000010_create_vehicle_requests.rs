//! Migration: Create vehicle request and approval tables
//!
//! The unique index on (request_id, approval_step) is what makes an approval
//! step decide-once under concurrent submission; application code treats its
//! violation as the conflict signal.

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_services_roles_users::Users;
use super::m20250301_000004_create_vehicles::Vehicle;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VehicleRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VehicleRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VehicleRequests::Purpose).string().not_null())
                    .col(
                        ColumnDef::new(VehicleRequests::FromLocation)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VehicleRequests::ToLocation).string().not_null())
                    .col(ColumnDef::new(VehicleRequests::Roadmap).text().null())
                    .col(
                        ColumnDef::new(VehicleRequests::DepartureTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VehicleRequests::ReturnTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VehicleRequests::Status)
                            .string_len(24)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(VehicleRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VehicleRequests::RequesterId).integer().null())
                    .col(ColumnDef::new(VehicleRequests::VehicleId).integer().null())
                    .col(ColumnDef::new(VehicleRequests::DriverId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(VehicleRequests::Table, VehicleRequests::RequesterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(VehicleRequests::Table, VehicleRequests::VehicleId)
                            .to(Vehicle::Table, Vehicle::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(VehicleRequests::Table, VehicleRequests::DriverId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vehicle_requests_status")
                    .table(VehicleRequests::Table)
                    .col(VehicleRequests::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vehicle_requests_requester")
                    .table(VehicleRequests::Table)
                    .col(VehicleRequests::RequesterId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RequestApprovals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RequestApprovals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RequestApprovals::RequestId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RequestApprovals::ApprovalStep)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RequestApprovals::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(RequestApprovals::Comments).text().null())
                    .col(ColumnDef::new(RequestApprovals::ApproverId).integer().null())
                    .col(
                        ColumnDef::new(RequestApprovals::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RequestApprovals::Table, RequestApprovals::RequestId)
                            .to(VehicleRequests::Table, VehicleRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RequestApprovals::Table, RequestApprovals::ApproverId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_request_approvals_step")
                    .table(RequestApprovals::Table)
                    .col(RequestApprovals::RequestId)
                    .col(RequestApprovals::ApprovalStep)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(RequestApprovals::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(VehicleRequests::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
#[iden = "vehicle_requests"]
pub enum VehicleRequests {
    Table,
    Id,
    Purpose,
    #[iden = "from_location"]
    FromLocation,
    #[iden = "to_location"]
    ToLocation,
    Roadmap,
    #[iden = "departure_time"]
    DepartureTime,
    #[iden = "return_time"]
    ReturnTime,
    Status,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "requester_id"]
    RequesterId,
    #[iden = "vehicle_id"]
    VehicleId,
    #[iden = "driver_id"]
    DriverId,
}

#[derive(Iden)]
#[iden = "request_approvals"]
pub enum RequestApprovals {
    Table,
    Id,
    #[iden = "request_id"]
    RequestId,
    #[iden = "approval_step"]
    ApprovalStep,
    Status,
    Comments,
    #[iden = "approver_id"]
    ApproverId,
    #[iden = "updated_at"]
    UpdatedAt,
}
