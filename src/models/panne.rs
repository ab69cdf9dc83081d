use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "panne")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vehicle_id: i32,
    pub category_id: i32,
    pub description: Option<String>,
    pub status: String,
    pub panne_date: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vehicle::Entity",
        from = "Column::VehicleId",
        to = "super::vehicle::Column::Id"
    )]
    Vehicle,
    #[sea_orm(
        belongs_to = "super::category_panne::Entity",
        from = "Column::CategoryId",
        to = "super::category_panne::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::reparation::Entity")]
    Reparations,
}

impl Related<super::vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicle.def()
    }
}

impl Related<super::category_panne::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::reparation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reparations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
