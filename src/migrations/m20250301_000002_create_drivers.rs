//! Migration: Create driver roster table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Driver::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Driver::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Driver::FirstName).string().not_null())
                    .col(ColumnDef::new(Driver::LastName).string().not_null())
                    .col(
                        ColumnDef::new(Driver::CniNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Driver::Email).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(Driver::Matricule)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Driver::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Driver::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Driver {
    Table,
    Id,
    #[iden = "first_name"]
    FirstName,
    #[iden = "last_name"]
    LastName,
    #[iden = "cni_number"]
    CniNumber,
    Email,
    Matricule,
    #[iden = "created_at"]
    CreatedAt,
}
