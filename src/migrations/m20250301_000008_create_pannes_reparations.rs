//! Migration: Create panne (breakdown) reports and reparation records

use sea_orm_migration::prelude::*;

use super::m20250301_000004_create_vehicles::Vehicle;
use super::m20250301_000006_create_garages_categories::{CategoryPanne, Garage};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Panne::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Panne::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Panne::VehicleId).integer().not_null())
                    .col(ColumnDef::new(Panne::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Panne::Description).string().null())
                    .col(
                        ColumnDef::new(Panne::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Panne::PanneDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Panne::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Panne::Table, Panne::VehicleId)
                            .to(Vehicle::Table, Vehicle::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Panne::Table, Panne::CategoryId)
                            .to(CategoryPanne::Table, CategoryPanne::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_panne_vehicle")
                    .table(Panne::Table)
                    .col(Panne::VehicleId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Reparation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reparation::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reparation::PanneId).integer().not_null())
                    .col(
                        ColumnDef::new(Reparation::Cost)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Reparation::Receipt).string().not_null())
                    .col(ColumnDef::new(Reparation::GarageId).integer().null())
                    .col(
                        ColumnDef::new(Reparation::RepairDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reparation::Status)
                            .string()
                            .not_null()
                            .default("in_progress"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Reparation::Table, Reparation::PanneId)
                            .to(Panne::Table, Panne::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Reparation::Table, Reparation::GarageId)
                            .to(Garage::Table, Garage::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reparation_panne")
                    .table(Reparation::Table)
                    .col(Reparation::PanneId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reparation::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Panne::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Panne {
    Table,
    Id,
    #[iden = "vehicle_id"]
    VehicleId,
    #[iden = "category_id"]
    CategoryId,
    Description,
    Status,
    #[iden = "panne_date"]
    PanneDate,
    #[iden = "created_at"]
    CreatedAt,
}

#[derive(Iden)]
pub enum Reparation {
    Table,
    Id,
    #[iden = "panne_id"]
    PanneId,
    Cost,
    Receipt,
    #[iden = "garage_id"]
    GarageId,
    #[iden = "repair_date"]
    RepairDate,
    Status,
}
