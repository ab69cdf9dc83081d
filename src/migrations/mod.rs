pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_services_roles_users;
mod m20250301_000002_create_drivers;
mod m20250301_000003_create_vehicle_lookups;
mod m20250301_000004_create_vehicles;
mod m20250301_000005_create_fuel;
mod m20250301_000006_create_garages_categories;
mod m20250301_000007_create_maintenance;
mod m20250301_000008_create_pannes_reparations;
mod m20250301_000009_create_trips;
mod m20250301_000010_create_vehicle_requests;
mod m20250301_000011_seed_roles;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_services_roles_users::Migration),
            Box::new(m20250301_000002_create_drivers::Migration),
            Box::new(m20250301_000003_create_vehicle_lookups::Migration),
            Box::new(m20250301_000004_create_vehicles::Migration),
            Box::new(m20250301_000005_create_fuel::Migration),
            Box::new(m20250301_000006_create_garages_categories::Migration),
            Box::new(m20250301_000007_create_maintenance::Migration),
            Box::new(m20250301_000008_create_pannes_reparations::Migration),
            Box::new(m20250301_000009_create_trips::Migration),
            Box::new(m20250301_000010_create_vehicle_requests::Migration),
            Box::new(m20250301_000011_seed_roles::Migration),
        ]
    }
}
