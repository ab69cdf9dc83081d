use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reparation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub panne_id: i32,
    pub cost: f64,
    pub receipt: String,
    pub garage_id: Option<i32>,
    pub repair_date: DateTimeUtc,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::panne::Entity",
        from = "Column::PanneId",
        to = "super::panne::Column::Id"
    )]
    Panne,
    #[sea_orm(
        belongs_to = "super::garage::Entity",
        from = "Column::GarageId",
        to = "super::garage::Column::Id"
    )]
    Garage,
}

impl Related<super::panne::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Panne.def()
    }
}

impl Related<super::garage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Garage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
