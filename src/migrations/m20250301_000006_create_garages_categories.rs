//! Migration: Create garage and maintenance/panne category tables

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Garage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Garage::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Garage::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CategoryMaintenance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CategoryMaintenance::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CategoryMaintenance::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CategoryPanne::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CategoryPanne::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CategoryPanne::Name).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(CategoryPanne::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(CategoryMaintenance::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Garage::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Garage {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
pub enum CategoryMaintenance {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
pub enum CategoryPanne {
    Table,
    Id,
    Name,
}
