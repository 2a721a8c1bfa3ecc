use sea_orm_migration::prelude::*;

mod m20251019_000001_create_schools_table;
mod m20251019_000002_create_reviews_table;
mod m20251019_000003_create_newsletter_subscriptions_table;
mod m20251019_000004_create_contact_submissions_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251019_000001_create_schools_table::Migration),
            Box::new(m20251019_000002_create_reviews_table::Migration),
            Box::new(m20251019_000003_create_newsletter_subscriptions_table::Migration),
            Box::new(m20251019_000004_create_contact_submissions_table::Migration),
        ]
    }
}

#[cfg(test)]
use sea_orm::{Database, DbErr};

#[tokio::test]
async fn test_migrations_okay() -> Result<(), DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    let schema_manager = SchemaManager::new(&db);

    Migrator::refresh(&db).await?;

    assert!(schema_manager.has_table("schools").await?);
    assert!(schema_manager.has_table("reviews").await?);
    assert!(schema_manager.has_table("newsletter_subscriptions").await?);
    assert!(schema_manager.has_table("contact_submissions").await?);

    assert!(schema_manager.has_column("schools", "total_reviews").await?);
    assert!(schema_manager.has_column("reviews", "school_id").await?);

    Ok(())
}

#[tokio::test]
async fn test_migrations_roll_back() -> Result<(), DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    let schema_manager = SchemaManager::new(&db);

    Migrator::up(&db, None).await?;
    Migrator::down(&db, None).await?;

    assert!(!schema_manager.has_table("schools").await?);
    assert!(!schema_manager.has_table("reviews").await?);

    Ok(())
}
