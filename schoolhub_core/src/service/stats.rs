use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use thiserror::Error;

use crate::{entity::prelude::*, service::rounded_mean};

#[derive(Debug, Error)]
pub enum StatsServiceError {
    #[error("database error: {0}")]
    DbError(#[from] DbErr),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryStats {
    pub total_schools: u64,
    pub total_cities: u64,
    pub total_reviews: u64,
    /// Mean of every review rating, one decimal place.
    pub average_rating: f64,
    pub active_subscribers: u64,
}

#[derive(Clone)]
pub struct StatsService {
    db: DatabaseConnection,
}

impl StatsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn summary(&self) -> Result<DirectoryStats, StatsServiceError> {
        let txn = self.db.begin().await?;

        let total_schools = School::find().count(&txn).await?;

        let total_cities = School::find()
            .select_only()
            .column(SchoolColumn::City)
            .distinct()
            .into_tuple::<String>()
            .all(&txn)
            .await?
            .len() as u64;

        let ratings = Review::find()
            .select_only()
            .column(ReviewColumn::Rating)
            .into_tuple::<i32>()
            .all(&txn)
            .await?;

        let active_subscribers = NewsletterSubscription::find()
            .filter(NewsletterSubscriptionColumn::Status.eq(SubscriptionStatus::Active))
            .count(&txn)
            .await?;

        txn.commit().await?;

        Ok(DirectoryStats {
            total_schools,
            total_cities,
            total_reviews: ratings.len() as u64,
            average_rating: rounded_mean(&ratings),
            active_subscribers,
        })
    }
}
