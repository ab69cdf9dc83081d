use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fuel_type")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fuel::Entity")]
    FuelRecords,
}

impl Related<super::fuel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FuelRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
