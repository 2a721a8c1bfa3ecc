use sea_orm::{sea_query::OnConflict, DatabaseConnection};
use thiserror::Error;
use tracing::info;

use crate::entity::prelude::*;

#[derive(Debug, Error)]
pub enum NewsletterServiceError {
    #[error("database error: {0}")]
    DbError(#[from] DbErr),

    #[error("Valid email is required")]
    InvalidEmail,

    #[error("subscription not found")]
    SubscriptionNotFound,
}

/// Trimmed, lower-cased address; rejects anything without an `@`.
fn normalize_email(email: Option<&str>) -> Result<String, NewsletterServiceError> {
    let email = email.map(str::trim).unwrap_or_default();
    if !email.contains('@') {
        return Err(NewsletterServiceError::InvalidEmail);
    }
    Ok(email.to_lowercase())
}

#[derive(Clone)]
pub struct NewsletterService {
    db: DatabaseConnection,
}

impl NewsletterService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Subscribe an address. An existing row, active or not, is flipped back
    /// to active in the same statement instead of being duplicated.
    pub async fn subscribe(
        &self,
        email: Option<&str>,
    ) -> Result<NewsletterSubscriptionModel, NewsletterServiceError> {
        let email = normalize_email(email)?;

        let subscription = NewsletterSubscriptionActiveModel {
            email: Set(email.clone()),
            status: Set(SubscriptionStatus::Active),
            subscribed_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        NewsletterSubscription::insert(subscription)
            .on_conflict(
                OnConflict::column(NewsletterSubscriptionColumn::Email)
                    .update_column(NewsletterSubscriptionColumn::Status)
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        info!("Newsletter subscription active for {email}");

        NewsletterSubscription::find()
            .filter(NewsletterSubscriptionColumn::Email.eq(email.as_str()))
            .one(&self.db)
            .await?
            .ok_or(NewsletterServiceError::SubscriptionNotFound)
    }

    /// Mark an existing subscription as unsubscribed
    pub async fn unsubscribe(&self, email: Option<&str>) -> Result<(), NewsletterServiceError> {
        let email = normalize_email(email)?;

        let result = NewsletterSubscription::update_many()
            .col_expr(
                NewsletterSubscriptionColumn::Status,
                sea_orm::sea_query::Expr::value(SubscriptionStatus::Unsubscribed),
            )
            .filter(NewsletterSubscriptionColumn::Email.eq(email.as_str()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(NewsletterServiceError::SubscriptionNotFound);
        }

        info!("Newsletter subscription cancelled for {email}");
        Ok(())
    }

    pub async fn count_active(&self) -> Result<u64, NewsletterServiceError> {
        let count = NewsletterSubscription::find()
            .filter(NewsletterSubscriptionColumn::Status.eq(SubscriptionStatus::Active))
            .count(&self.db)
            .await?;

        Ok(count)
    }
}
