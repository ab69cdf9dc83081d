//! Migration: Seed the fixed role set
//!
//! The approval chain and every authorization decision are keyed off these
//! role names; `RoleKind` in the middleware parses them.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        use crate::models::prelude::*;
        use crate::models::role;

        let db = manager.get_connection();

        let role_count = Role::find().count(db).await?;
        if role_count > 0 {
            return Ok(());
        }

        let default_roles = [
            ("superadmin", "Unrestricted administrator"),
            ("admin", "Fleet administrator"),
            ("charoi", "Vehicle pool dispatcher, final approval step"),
            ("logistic", "Logistics desk, second approval step"),
            ("chef", "Department head, first approval step"),
            ("user", "Regular requester"),
            ("driver", "Assignable driver account"),
        ];

        for (name, description) in default_roles {
            let new_role = role::ActiveModel {
                name: Set(name.to_string()),
                description: Set(Some(description.to_string())),
                ..Default::default()
            };
            new_role.insert(db).await?;
        }

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // Seeding is not reversible - data may have been modified
        Ok(())
    }
}
