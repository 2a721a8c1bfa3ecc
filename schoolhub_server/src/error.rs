use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schoolhub_core::{
    error::CoreError,
    service::{
        contact::ContactServiceError, newsletter::NewsletterServiceError,
        reviews::ReviewsServiceError, schools::SchoolsServiceError, stats::StatsServiceError,
    },
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to start: {0}")]
    Core(#[from] CoreError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn bad_request(error: impl ToString) -> Self {
        ApiError::BadRequest(error.to_string())
    }

    fn not_found(error: impl ToString) -> Self {
        ApiError::NotFound(error.to_string())
    }

    fn internal(error: impl ToString) -> Self {
        ApiError::Internal(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {self}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<SchoolsServiceError> for ApiError {
    fn from(error: SchoolsServiceError) -> Self {
        match error {
            SchoolsServiceError::DbError(_) => ApiError::internal(error),
            SchoolsServiceError::Storage(_) => ApiError::internal(error),
            SchoolsServiceError::SchoolNotFound => ApiError::not_found(error),
            SchoolsServiceError::MissingField(_) => ApiError::bad_request(error),
            SchoolsServiceError::InvalidField { .. } => ApiError::bad_request(error),
            SchoolsServiceError::UnknownLabel(_) => ApiError::bad_request(error),
            SchoolsServiceError::NotAnImage => ApiError::bad_request(error),
        }
    }
}

impl From<ReviewsServiceError> for ApiError {
    fn from(error: ReviewsServiceError) -> Self {
        match error {
            ReviewsServiceError::DbError(_) => ApiError::internal(error),
            ReviewsServiceError::SchoolNotFound => ApiError::not_found(error),
            ReviewsServiceError::MissingRating => ApiError::bad_request(error),
            ReviewsServiceError::InvalidRating => ApiError::bad_request(error),
            ReviewsServiceError::InvalidEmail => ApiError::bad_request(error),
        }
    }
}

impl From<NewsletterServiceError> for ApiError {
    fn from(error: NewsletterServiceError) -> Self {
        match error {
            NewsletterServiceError::DbError(_) => ApiError::internal(error),
            NewsletterServiceError::InvalidEmail => ApiError::bad_request(error),
            NewsletterServiceError::SubscriptionNotFound => ApiError::not_found(error),
        }
    }
}

impl From<ContactServiceError> for ApiError {
    fn from(error: ContactServiceError) -> Self {
        match error {
            ContactServiceError::DbError(_) => ApiError::internal(error),
            ContactServiceError::MissingField(_) => ApiError::bad_request(error),
            ContactServiceError::InvalidEmail => ApiError::bad_request(error),
        }
    }
}

impl From<StatsServiceError> for ApiError {
    fn from(error: StatsServiceError) -> Self {
        match error {
            StatsServiceError::DbError(_) => ApiError::internal(error),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        ApiError::bad_request(error.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}
