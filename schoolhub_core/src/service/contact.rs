use sea_orm::DatabaseConnection;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::{entity::prelude::*, service::non_blank};

#[derive(Debug, Error)]
pub enum ContactServiceError {
    #[error("database error: {0}")]
    DbError(#[from] DbErr),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Valid email is required")]
    InvalidEmail,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactMessage {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone)]
pub struct ContactService {
    db: DatabaseConnection,
}

impl ContactService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Store a contact form submission. There is no read side.
    pub async fn submit(
        &self,
        message: ContactMessage,
    ) -> Result<ContactSubmissionModel, ContactServiceError> {
        let name = non_blank(message.name.as_deref()).ok_or(ContactServiceError::MissingField("name"))?;
        let email =
            non_blank(message.email.as_deref()).ok_or(ContactServiceError::MissingField("email"))?;
        let body = non_blank(message.message.as_deref())
            .ok_or(ContactServiceError::MissingField("message"))?;

        if !email.contains('@') {
            return Err(ContactServiceError::InvalidEmail);
        }

        let submission = ContactSubmissionActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            subject: Set(non_blank(message.subject.as_deref()).map(str::to_string)),
            message: Set(body.to_string()),
            phone: Set(non_blank(message.phone.as_deref()).map(str::to_string)),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let stored = ContactSubmission::insert(submission)
            .exec_with_returning(&self.db)
            .await?;

        info!("Contact message {} received", stored.id);
        Ok(stored)
    }
}
