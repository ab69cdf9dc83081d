pub mod category_maintenance;
pub mod category_panne;
pub mod driver;
pub mod fuel;
pub mod fuel_type;
pub mod garage;
pub mod maintenance;
pub mod panne;
pub mod reparation;
pub mod role;
pub mod service;
pub mod trip;
pub mod user;
pub mod vehicle;
pub mod vehicle_make;
pub mod vehicle_model;
pub mod vehicle_request;
pub mod vehicle_transmission;
pub mod vehicle_type;
pub mod request_approval;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::category_maintenance::{self, Entity as CategoryMaintenance};
    pub use super::category_panne::{self, Entity as CategoryPanne};
    pub use super::driver::{self, Entity as Driver};
    pub use super::fuel::{self, Entity as Fuel};
    pub use super::fuel_type::{self, Entity as FuelType};
    pub use super::garage::{self, Entity as Garage};
    pub use super::maintenance::{self, Entity as Maintenance};
    pub use super::panne::{self, Entity as Panne};
    pub use super::reparation::{self, Entity as Reparation};
    pub use super::request_approval::{self, Entity as RequestApproval};
    pub use super::role::{self, Entity as Role};
    pub use super::service::{self, Entity as Service};
    pub use super::trip::{self, Entity as Trip};
    pub use super::user::{self, Entity as User};
    pub use super::vehicle::{self, Entity as Vehicle};
    pub use super::vehicle_make::{self, Entity as VehicleMake};
    pub use super::vehicle_model::{self, Entity as VehicleModel};
    pub use super::vehicle_request::{self, Entity as VehicleRequest};
    pub use super::vehicle_transmission::{self, Entity as VehicleTransmission};
    pub use super::vehicle_type::{self, Entity as VehicleType};
}
