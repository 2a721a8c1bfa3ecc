use std::path::PathBuf;

use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;

use crate::{entity::prelude::*, models::migrator::Migrator};

/// Create a fresh in-memory SQLite database with every migration applied.
/// Each call returns an isolated instance.
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// A unique scratch directory under the system temp dir.
pub fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("schoolhub-{label}-{}", uuid::Uuid::now_v7()));
    std::fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    dir
}

/// Insert a school row directly, bypassing validation.
pub async fn insert_school(
    db: &DatabaseConnection,
    name: &str,
    city: &str,
    board: Board,
    gender_type: GenderType,
) -> SchoolModel {
    SchoolActiveModel {
        name: Set(name.to_string()),
        address: Set(format!("1 Main Road, {city}")),
        city: Set(city.to_string()),
        state: Set("Uttar Pradesh".to_string()),
        contact: Set("9876543210".to_string()),
        image: Set(None),
        email_id: Set("office@example.com".to_string()),
        board: Set(board),
        gender_type: Set(gender_type),
        established_year: Set(None),
        website: Set(None),
        description: Set(None),
        fees_range: Set(None),
        rating: Set(0.0),
        total_reviews: Set(0),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert school")
}
