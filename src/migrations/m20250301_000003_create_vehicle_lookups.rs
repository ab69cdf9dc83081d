//! Migration: Create vehicle make/model/type/transmission and fuel type lookups

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

async fn create_lookup<T>(manager: &SchemaManager<'_>, table: T, name: T) -> Result<(), DbErr>
where
    T: Iden + Copy + 'static,
{
    manager
        .create_table(
            Table::create()
                .table(table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Lookup::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(ColumnDef::new(name).string().not_null())
                .to_owned(),
        )
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_lookup(manager, VehicleMake::Table, VehicleMake::Name).await?;
        create_lookup(manager, VehicleModel::Table, VehicleModel::Name).await?;
        create_lookup(manager, VehicleType::Table, VehicleType::Name).await?;
        create_lookup(manager, Transmission::Table, Transmission::Name).await?;

        // Fuel types carry a uniqueness guarantee the other lookups do not.
        manager
            .create_table(
                Table::create()
                    .table(FuelType::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FuelType::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FuelType::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FuelType::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(Transmission::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(VehicleType::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(VehicleModel::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(VehicleMake::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
enum Lookup {
    Id,
}

#[derive(Iden, Clone, Copy)]
pub enum VehicleMake {
    Table,
    Name,
}

#[derive(Iden, Clone, Copy)]
pub enum VehicleModel {
    Table,
    Name,
}

#[derive(Iden, Clone, Copy)]
pub enum VehicleType {
    Table,
    Name,
}

#[derive(Iden, Clone, Copy)]
#[iden = "vehicle_transmission"]
pub enum Transmission {
    Table,
    Name,
}

#[derive(Iden, Clone, Copy)]
pub enum FuelType {
    Table,
    Id,
    Name,
}
