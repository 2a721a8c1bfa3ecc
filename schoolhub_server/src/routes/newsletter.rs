use axum::{extract::rejection::JsonRejection, extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct EmailPayload {
    email: Option<String>,
}

pub async fn subscribe_handler(
    State(hub): State<AppState>,
    payload: Result<Json<EmailPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    hub.newsletter.subscribe(payload.email.as_deref()).await?;

    Ok(Json(
        json!({ "message": "Successfully subscribed to newsletter!" }),
    ))
}

pub async fn unsubscribe_handler(
    State(hub): State<AppState>,
    payload: Result<Json<EmailPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    hub.newsletter.unsubscribe(payload.email.as_deref()).await?;

    Ok(Json(json!({ "message": "Successfully unsubscribed" })))
}
