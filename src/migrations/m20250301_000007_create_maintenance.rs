//! Migration: Create maintenance records

use sea_orm_migration::prelude::*;

use super::m20250301_000004_create_vehicles::Vehicle;
use super::m20250301_000006_create_garages_categories::{CategoryMaintenance, Garage};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Maintenance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Maintenance::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Maintenance::CategoryId).integer().null())
                    .col(ColumnDef::new(Maintenance::VehicleId).integer().not_null())
                    .col(ColumnDef::new(Maintenance::GarageId).integer().null())
                    .col(
                        ColumnDef::new(Maintenance::Cost)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Maintenance::Receipt).string().not_null())
                    .col(
                        ColumnDef::new(Maintenance::MaintenanceDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Maintenance::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Maintenance::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Maintenance::Table, Maintenance::CategoryId)
                            .to(CategoryMaintenance::Table, CategoryMaintenance::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Maintenance::Table, Maintenance::VehicleId)
                            .to(Vehicle::Table, Vehicle::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Maintenance::Table, Maintenance::GarageId)
                            .to(Garage::Table, Garage::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_maintenance_vehicle")
                    .table(Maintenance::Table)
                    .col(Maintenance::VehicleId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_maintenance_date")
                    .table(Maintenance::Table)
                    .col(Maintenance::MaintenanceDate)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Maintenance::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Maintenance {
    Table,
    Id,
    #[iden = "category_id"]
    CategoryId,
    #[iden = "vehicle_id"]
    VehicleId,
    #[iden = "garage_id"]
    GarageId,
    Cost,
    Receipt,
    #[iden = "maintenance_date"]
    MaintenanceDate,
    #[iden = "created_at"]
    CreatedAt,
    Status,
}
