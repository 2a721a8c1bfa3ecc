use axum::{extract::State, response::IntoResponse, Json};

use crate::{error::ApiError, state::AppState};

pub async fn summary_handler(State(hub): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stats = hub.stats.summary().await?;

    Ok(Json(stats))
}
