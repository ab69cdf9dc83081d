//! Migration: Create fuel purchase records

use sea_orm_migration::prelude::*;

use super::m20250301_000003_create_vehicle_lookups::FuelType;
use super::m20250301_000004_create_vehicles::Vehicle;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Fuel::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Fuel::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Fuel::VehicleId).integer().not_null())
                    .col(ColumnDef::new(Fuel::FuelTypeId).integer().not_null())
                    .col(ColumnDef::new(Fuel::Quantity).double().not_null())
                    .col(ColumnDef::new(Fuel::PricePerLiter).double().not_null())
                    .col(ColumnDef::new(Fuel::Cost).double().not_null())
                    .col(
                        ColumnDef::new(Fuel::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Fuel::Table, Fuel::VehicleId)
                            .to(Vehicle::Table, Vehicle::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Fuel::Table, Fuel::FuelTypeId)
                            .to(FuelType::Table, FuelType::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fuel_vehicle")
                    .table(Fuel::Table)
                    .col(Fuel::VehicleId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fuel_created_at")
                    .table(Fuel::Table)
                    .col(Fuel::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Fuel::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Fuel {
    Table,
    Id,
    #[iden = "vehicle_id"]
    VehicleId,
    #[iden = "fuel_type_id"]
    FuelTypeId,
    Quantity,
    #[iden = "price_per_liter"]
    PricePerLiter,
    Cost,
    #[iden = "created_at"]
    CreatedAt,
}
