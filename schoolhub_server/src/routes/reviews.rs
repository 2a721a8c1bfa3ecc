use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use schoolhub_core::{
    ids::SchoolId,
    service::{
        reviews::{NewReview, DEFAULT_REVIEW_LIMIT},
        Pagination,
    },
};
use serde::Deserialize;
use serde_json::json;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ReviewListParams {
    page: Option<String>,
    limit: Option<String>,
}

pub async fn list_handler(
    State(hub): State<AppState>,
    path: Result<Path<SchoolId>, PathRejection>,
    Query(params): Query<ReviewListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    let pagination = Pagination::parse(
        params.page.as_deref(),
        params.limit.as_deref(),
        DEFAULT_REVIEW_LIMIT,
    );

    let page = hub.reviews.list(id, pagination).await?;
    Ok(Json(page))
}

pub async fn submit_handler(
    State(hub): State<AppState>,
    path: Result<Path<SchoolId>, PathRejection>,
    payload: Result<Json<NewReview>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    let Json(review) = payload?;

    let submitted = hub.reviews.submit(id, review).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Review submitted successfully",
            "review": submitted.review,
            "rating": submitted.rating,
            "total_reviews": submitted.total_reviews,
        })),
    ))
}
