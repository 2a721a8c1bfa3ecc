use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::HubConfig;

pub mod migrator;
pub mod seed;

pub async fn open_or_create_db(config: &HubConfig) -> Result<DatabaseConnection, DbErr> {
    // mode=rwc creates the file on first start
    let connection_string = format!("sqlite://{}?mode=rwc", config.database_path.display());

    info!("Opening database at {}", config.database_path.display());
    Database::connect(&connection_string).await
}

pub async fn migrate_up(db: &DatabaseConnection) -> Result<(), DbErr> {
    migrator::Migrator::up(db, None).await?;
    info!("Database migrations applied");
    Ok(())
}
