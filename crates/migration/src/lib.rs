pub use sea_orm_migration::prelude::*;

mod m20260801_120000_create_status_tables;
mod m20260801_130000_create_operator_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_120000_create_status_tables::Migration),
            Box::new(m20260801_130000_create_operator_tables::Migration),
        ]
    }
}
