use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "maintenance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category_id: Option<i32>,
    pub vehicle_id: i32,
    pub garage_id: Option<i32>,
    pub cost: f64,
    pub receipt: String,
    pub maintenance_date: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub status: String,
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
        belongs_to = "super::category_maintenance::Entity",
        from = "Column::CategoryId",
        to = "super::category_maintenance::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::garage::Entity",
        from = "Column::GarageId",
        to = "super::garage::Column::Id"
    )]
    Garage,
}

impl Related<super::vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicle.def()
    }
}

impl Related<super::category_maintenance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::garage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Garage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
