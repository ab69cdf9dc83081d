use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fuel")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vehicle_id: i32,
    pub fuel_type_id: i32,
    pub quantity: f64,
    pub price_per_liter: f64,
    /// Always computed server-side as `quantity * price_per_liter`.
    pub cost: f64,
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
        belongs_to = "super::fuel_type::Entity",
        from = "Column::FuelTypeId",
        to = "super::fuel_type::Column::Id"
    )]
    FuelType,
}

impl Related<super::vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicle.def()
    }
}

impl Related<super::fuel_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FuelType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
