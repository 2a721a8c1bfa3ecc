use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use schoolhub_core::service::contact::ContactMessage;
use serde_json::json;

use crate::{error::ApiError, state::AppState};

pub async fn submit_handler(
    State(hub): State<AppState>,
    payload: Result<Json<ContactMessage>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(message) = payload?;
    let stored = hub.contact.submit(message).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Thanks for reaching out!", "id": stored.id })),
    ))
}
