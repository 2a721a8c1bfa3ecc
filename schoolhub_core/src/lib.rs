pub mod entity;
pub mod ids;
pub mod models;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::{
    service::{
        contact::ContactService, newsletter::NewsletterService, reviews::ReviewsService,
        schools::SchoolsService, stats::StatsService,
    },
    storage::ImageStore,
};

pub mod service;

pub mod storage;

pub mod error;

pub mod config;

#[cfg(test)]
pub(crate) mod test_utils;

/// Main runtime handle: one connection pool shared by every service.
#[derive(Clone)]
pub struct SchoolHub {
    pub config: config::HubConfig,

    pub db: DatabaseConnection,

    pub images: ImageStore,

    pub schools: SchoolsService,
    pub reviews: ReviewsService,
    pub newsletter: NewsletterService,
    pub contact: ContactService,
    pub stats: StatsService,
}

impl SchoolHub {
    /// Opens the database, applies migrations and wires up the services.
    pub async fn start(config: config::HubConfig) -> Result<Self, error::CoreError> {
        let db = models::open_or_create_db(&config).await?;
        models::migrate_up(&db).await?;

        let images = ImageStore::new(config.upload_dir.clone());
        images.ensure_dir().await?;

        if config.seed_sample_data {
            models::seed::insert_sample_schools(&db).await?;
        }

        info!("Image uploads stored in {}", images.root().display());
        Ok(Self::with_connection(config, db, images))
    }

    /// Builds the services on an already migrated connection.
    pub fn with_connection(
        config: config::HubConfig,
        db: DatabaseConnection,
        images: ImageStore,
    ) -> Self {
        Self {
            schools: SchoolsService::new(db.clone(), images.clone()),
            reviews: ReviewsService::new(db.clone()),
            newsletter: NewsletterService::new(db.clone()),
            contact: ContactService::new(db.clone()),
            stats: StatsService::new(db.clone()),
            config,
            db,
            images,
        }
    }

    pub async fn shutdown(self) -> Result<(), error::CoreError> {
        self.db.close().await?;
        Ok(())
    }
}

pub mod prelude {
    pub use super::ids;
    pub use super::entity;
    pub use super::models;

    pub use super::service;

    pub use super::storage;

    pub use super::error;

    pub use super::config;

    pub use super::SchoolHub;
}
