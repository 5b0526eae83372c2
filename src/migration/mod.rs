pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_users_table;
mod m20250901_000002_create_applications_table;
mod m20250901_000003_create_user_states_table;
mod m20250901_000004_create_broadcasts_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_users_table::Migration),
            Box::new(m20250901_000002_create_applications_table::Migration),
            Box::new(m20250901_000003_create_user_states_table::Migration),
            Box::new(m20250901_000004_create_broadcasts_table::Migration),
        ]
    }
}
