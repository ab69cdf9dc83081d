//! Migration: Create trip table

use sea_orm_migration::prelude::*;

use super::m20250301_000002_create_drivers::Driver;
use super::m20250301_000004_create_vehicles::Vehicle;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trip::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Trip::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Trip::VehicleId).integer().not_null())
                    .col(ColumnDef::new(Trip::DriverId).integer().not_null())
                    .col(ColumnDef::new(Trip::StartLocation).string().not_null())
                    .col(ColumnDef::new(Trip::EndLocation).string().not_null())
                    .col(
                        ColumnDef::new(Trip::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Trip::EndTime).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Trip::Purpose).string().null())
                    .col(ColumnDef::new(Trip::Notes).string().null())
                    .col(
                        ColumnDef::new(Trip::Status)
                            .string()
                            .not_null()
                            .default("planned"),
                    )
                    .col(
                        ColumnDef::new(Trip::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Trip::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Trip::Table, Trip::VehicleId)
                            .to(Vehicle::Table, Vehicle::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Trip::Table, Trip::DriverId)
                            .to(Driver::Table, Driver::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trip_start_time")
                    .table(Trip::Table)
                    .col(Trip::StartTime)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trip_status")
                    .table(Trip::Table)
                    .col(Trip::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trip::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Trip {
    Table,
    Id,
    #[iden = "vehicle_id"]
    VehicleId,
    #[iden = "driver_id"]
    DriverId,
    #[iden = "start_location"]
    StartLocation,
    #[iden = "end_location"]
    EndLocation,
    #[iden = "start_time"]
    StartTime,
    #[iden = "end_time"]
    EndTime,
    Purpose,
    Notes,
    Status,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}
