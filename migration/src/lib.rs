pub use sea_orm_migration::prelude::*;

mod m20240115_000001_create_users;
mod m20240115_000002_create_rides;
mod m20240115_000003_create_bookings;
mod m20240115_000004_create_sos_alerts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240115_000001_create_users::Migration),
            Box::new(m20240115_000002_create_rides::Migration),
            Box::new(m20240115_000003_create_bookings::Migration),
            Box::new(m20240115_000004_create_sos_alerts::Migration),
        ]
    }
}
