use crate::{errors::Result, migration::Migrator};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::{MigratorTrait, SchemaManager};

const TABLES: [&str; 4] = ["users", "applications", "user_states", "broadcasts"];

pub async fn init(database_url: &str) -> Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.sqlx_logging_level(log::LevelFilter::Debug);
    connect(opt).await
}

/// Connects with explicit options and brings the schema up to date.
pub async fn connect(options: ConnectOptions) -> Result<DatabaseConnection> {
    let connection = Database::connect(options).await?;
    log::info!("Connected to database...");

    Migrator::up(&connection, None).await?;
    let schema_manager = SchemaManager::new(&connection);
    for table in TABLES {
        if !schema_manager.has_table(table).await? {
            return Err(sea_orm::DbErr::Custom(format!("table {} is missing after migrations", table)).into());
        }
    }
    log::info!("Applied migrations...");

    Ok(connection)
}
