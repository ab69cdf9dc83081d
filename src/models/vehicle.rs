use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vehicle")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub make_id: Option<i32>,
    pub model_id: Option<i32>,
    pub year: Option<i32>,
    #[sea_orm(unique)]
    pub plate_number: String,
    pub mileage: f64,
    pub engine_size: f64,
    pub vehicle_type_id: Option<i32>,
    pub transmission_id: Option<i32>,
    pub fuel_type_id: Option<i32>,
    #[sea_orm(unique)]
    pub vin: String,
    pub color: String,
    pub purchase_price: f64,
    pub purchase_date: Option<DateTimeUtc>,
    pub status: String,
    pub registration_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vehicle_make::Entity",
        from = "Column::MakeId",
        to = "super::vehicle_make::Column::Id"
    )]
    Make,
    #[sea_orm(
        belongs_to = "super::vehicle_model::Entity",
        from = "Column::ModelId",
        to = "super::vehicle_model::Column::Id"
    )]
    VehicleModel,
    #[sea_orm(
        belongs_to = "super::vehicle_type::Entity",
        from = "Column::VehicleTypeId",
        to = "super::vehicle_type::Column::Id"
    )]
    VehicleType,
    #[sea_orm(
        belongs_to = "super::vehicle_transmission::Entity",
        from = "Column::TransmissionId",
        to = "super::vehicle_transmission::Column::Id"
    )]
    Transmission,
    #[sea_orm(
        belongs_to = "super::fuel_type::Entity",
        from = "Column::FuelTypeId",
        to = "super::fuel_type::Column::Id"
    )]
    FuelType,
    #[sea_orm(has_many = "super::fuel::Entity")]
    FuelRecords,
    #[sea_orm(has_many = "super::trip::Entity")]
    Trips,
    #[sea_orm(has_many = "super::panne::Entity")]
    Pannes,
    #[sea_orm(has_many = "super::maintenance::Entity")]
    Maintenances,
}

impl Related<super::vehicle_make::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Make.def()
    }
}

impl Related<super::vehicle_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VehicleModel.def()
    }
}

impl Related<super::fuel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FuelRecords.def()
    }
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
