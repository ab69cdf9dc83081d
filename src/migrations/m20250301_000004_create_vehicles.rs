//! Migration: Create vehicle table

use sea_orm_migration::prelude::*;

use super::m20250301_000003_create_vehicle_lookups::{
    FuelType, Transmission, VehicleMake, VehicleModel, VehicleType,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vehicle::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vehicle::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vehicle::MakeId).integer().null())
                    .col(ColumnDef::new(Vehicle::ModelId).integer().null())
                    .col(ColumnDef::new(Vehicle::Year).integer().null())
                    .col(
                        ColumnDef::new(Vehicle::PlateNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Vehicle::Mileage)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Vehicle::EngineSize)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Vehicle::VehicleTypeId).integer().null())
                    .col(ColumnDef::new(Vehicle::TransmissionId).integer().null())
                    .col(ColumnDef::new(Vehicle::FuelTypeId).integer().null())
                    .col(ColumnDef::new(Vehicle::Vin).string().not_null().unique_key())
                    .col(ColumnDef::new(Vehicle::Color).string().not_null())
                    .col(
                        ColumnDef::new(Vehicle::PurchasePrice)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Vehicle::PurchaseDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Vehicle::Status)
                            .string()
                            .not_null()
                            .default("available"),
                    )
                    .col(
                        ColumnDef::new(Vehicle::RegistrationDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Vehicle::Table, Vehicle::MakeId)
                            .to(VehicleMake::Table, Alias::new("id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Vehicle::Table, Vehicle::ModelId)
                            .to(VehicleModel::Table, Alias::new("id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Vehicle::Table, Vehicle::VehicleTypeId)
                            .to(VehicleType::Table, Alias::new("id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Vehicle::Table, Vehicle::TransmissionId)
                            .to(Transmission::Table, Alias::new("id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Vehicle::Table, Vehicle::FuelTypeId)
                            .to(FuelType::Table, FuelType::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vehicle_status")
                    .table(Vehicle::Table)
                    .col(Vehicle::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vehicle::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Vehicle {
    Table,
    Id,
    #[iden = "make_id"]
    MakeId,
    #[iden = "model_id"]
    ModelId,
    Year,
    #[iden = "plate_number"]
    PlateNumber,
    Mileage,
    #[iden = "engine_size"]
    EngineSize,
    #[iden = "vehicle_type_id"]
    VehicleTypeId,
    #[iden = "transmission_id"]
    TransmissionId,
    #[iden = "fuel_type_id"]
    FuelTypeId,
    Vin,
    Color,
    #[iden = "purchase_price"]
    PurchasePrice,
    #[iden = "purchase_date"]
    PurchaseDate,
    Status,
    #[iden = "registration_date"]
    RegistrationDate,
}
