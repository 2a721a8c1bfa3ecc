use axum::{
    extract::{
        multipart::MultipartRejection, rejection::PathRejection, Multipart, Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use schoolhub_core::{
    ids::SchoolId,
    service::schools::{ListingParams, ListingQuery, SchoolForm},
    storage::ImageUpload,
};
use serde_json::json;
use tracing::debug;

use crate::{error::ApiError, state::AppState};

pub async fn list_handler(
    State(hub): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ListingQuery::normalize(&params)?;
    let page = hub.schools.list(&query).await?;

    Ok(Json(page))
}

pub async fn get_handler(
    State(hub): State<AppState>,
    path: Result<Path<SchoolId>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    let school = hub.schools.get(id).await?;

    Ok(Json(school))
}

pub async fn create_handler(
    State(hub): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_school_form(multipart?).await?;
    let school = hub.schools.create(form).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "School added successfully", "id": school.id })),
    ))
}

pub async fn update_handler(
    State(hub): State<AppState>,
    path: Result<Path<SchoolId>, PathRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    let form = read_school_form(multipart?).await?;
    let school = hub.schools.update(id, form).await?;

    Ok(Json(school))
}

pub async fn delete_handler(
    State(hub): State<AppState>,
    path: Result<Path<SchoolId>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    hub.schools.delete(id).await?;

    Ok(Json(json!({ "message": "School deleted successfully" })))
}

pub async fn cities_handler(State(hub): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let cities = hub.schools.cities().await?;

    Ok(Json(cities))
}

/// Collects text fields and the optional `image` file part. A file part
/// with no bytes is the browser's "no file chosen" and is ignored.
async fn read_school_form(mut multipart: Multipart) -> Result<SchoolForm, ApiError> {
    let mut form = SchoolForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "image" {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await?;

            if !data.is_empty() {
                form.image = Some(ImageUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            continue;
        }

        let slot = match name.as_str() {
            "name" => &mut form.name,
            "address" => &mut form.address,
            "city" => &mut form.city,
            "state" => &mut form.state,
            "contact" => &mut form.contact,
            "email_id" => &mut form.email_id,
            "board" => &mut form.board,
            "gender_type" => &mut form.gender_type,
            "established_year" => &mut form.established_year,
            "website" => &mut form.website,
            "description" => &mut form.description,
            "fees_range" => &mut form.fees_range,
            _ => {
                debug!("Ignoring unknown form field {name}");
                continue;
            }
        };
        *slot = Some(field.text().await?);
    }

    Ok(form)
}
