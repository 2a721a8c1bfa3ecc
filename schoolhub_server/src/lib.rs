use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, Method},
    Router,
};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use schoolhub_core::{error::CoreError, storage::PUBLIC_PREFIX};

pub mod error;
pub mod routes;
pub mod state;

use error::ServerError;
use state::AppState;

/// Largest request body accepted, sized for a school photo upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let images = ServeDir::new(state.images.root());

    routes::api_routes()
        .nest_service(PUBLIC_PREFIX, images)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() -> Result<(), ServerError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = state::init_state().await?;

    info!("Starting server...");
    let address = state.config.listen_addr.clone();
    let app = app(state.clone());

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");
    state
        .db
        .clone()
        .close()
        .await
        .map_err(CoreError::from)?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use schoolhub_core::{config::HubConfig, SchoolHub};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;

    const BOUNDARY: &str = "schoolhub-test-boundary";
    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot really a png";

    async fn test_app() -> (Router, AppState) {
        let dir = std::env::temp_dir().join(format!("schoolhub-server-{}", Uuid::now_v7()));
        tokio::fs::create_dir_all(&dir).await.unwrap();

        let mut config = HubConfig::new(&dir);
        config.seed_sample_data = false;

        let state = Arc::new(SchoolHub::start(config).await.unwrap());
        (app(state.clone()), state)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart(method: &str, uri: &str, fields: &[(&str, &str)], image: Option<&[u8]>) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(bytes) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"front.png\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn oak_hall_fields() -> Vec<(&'static str, &'static str)> {
        vec![
            ("name", "Oak Hall"),
            ("address", "12 Hazratganj Road"),
            ("city", "Lucknow"),
            ("state", "Uttar Pradesh"),
            ("contact", "9876543210"),
            ("email_id", "office@oakhall.edu"),
            ("board", "CBSE"),
        ]
    }

    async fn create_oak_hall(app: &Router, image: Option<&[u8]>) -> Value {
        let (status, body) = send_json(
            app,
            multipart("POST", "/api/schools", &oak_hall_fields(), image),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["message"], "School added successfully");
        body["id"].clone()
    }

    #[tokio::test]
    async fn test_created_school_matches_board_filter() {
        let (app, _) = test_app().await;
        let id = create_oak_hall(&app, None).await;

        let (status, body) = send_json(&app, get("/api/schools?board=CBSE")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["page"], 1);
        assert_eq!(body["totalPages"], 1);
        assert_eq!(body["schools"][0]["id"], id);
        assert_eq!(body["schools"][0]["gender_type"], "Co-Education");

        let (status, body) = send_json(&app, get("/api/schools?board=ICSE")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
        assert_eq!(body["schools"], json!([]));
    }

    #[tokio::test]
    async fn test_huge_page_returns_empty_listing() {
        let (app, _) = test_app().await;
        let id = create_oak_hall(&app, None).await;

        let (status, body) = send_json(&app, get("/api/schools?page=9223372036854775807")).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["total"], 1);
        assert_eq!(body["schools"], json!([]));

        let uri = format!("/api/schools/{id}/reviews?page=18446744073709551615&limit=100");
        let (status, body) = send_json(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["reviews"], json!([]));
    }

    #[tokio::test]
    async fn test_unknown_board_filter_is_bad_request() {
        let (app, _) = test_app().await;

        let (status, body) = send_json(&app, get("/api/schools?board=Hogwarts")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Hogwarts"));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_contact() {
        let (app, _) = test_app().await;

        let mut fields = oak_hall_fields();
        fields.retain(|(name, _)| *name != "contact");
        fields.push(("contact", "12345"));

        let (status, body) = send_json(&app, multipart("POST", "/api/schools", &fields, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (_, body) = send_json(&app, get("/api/schools")).await;
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn test_uploaded_image_is_served_and_removed_on_delete() {
        let (app, state) = test_app().await;
        let id = create_oak_hall(&app, Some(PNG_BYTES)).await;

        let (_, school) = send_json(&app, get(&format!("/api/schools/{id}"))).await;
        let image = school["image"].as_str().unwrap().to_string();
        assert!(image.starts_with("/schoolImages/"));

        let (status, bytes) = send(&app, get(&image)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, PNG_BYTES);

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/api/schools/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "School deleted successfully");

        let on_disk = state.images.resolve(&image).unwrap();
        assert!(!on_disk.exists());

        let (status, body) = send_json(&app, get(&format!("/api/schools/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "school not found");
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let (app, _) = test_app().await;
        let id = create_oak_hall(&app, None).await;

        let fields = [("city", "Kanpur"), ("name", "")];
        let (status, body) = send_json(
            &app,
            multipart("PUT", &format!("/api/schools/{id}"), &fields, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["city"], "Kanpur");
        assert_eq!(body["name"], "Oak Hall");
    }

    #[tokio::test]
    async fn test_review_updates_aggregate() {
        let (app, _) = test_app().await;
        let id = create_oak_hall(&app, None).await;
        let uri = format!("/api/schools/{id}/review");

        let (status, body) = send_json(&app, post_json(&uri, json!({ "rating": 6 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "rating must be between 1 and 5");

        let (status, _) = send_json(&app, post_json(&uri, json!({ "rating": 5 }))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send_json(
            &app,
            post_json(&uri, json!({ "rating": 2, "reviewer_name": "Asha" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["rating"], 3.5);
        assert_eq!(body["total_reviews"], 2);
        assert_eq!(body["review"]["reviewer_name"], "Asha");

        let (status, body) =
            send_json(&app, get(&format!("/api/schools/{id}/reviews?limit=1"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["reviews"][0]["rating"], 2);
    }

    #[tokio::test]
    async fn test_review_for_missing_school() {
        let (app, _) = test_app().await;

        let (status, body) =
            send_json(&app, post_json("/api/schools/404/review", json!({ "rating": 3 }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "school not found");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, _) = test_app().await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/newsletter")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let (status, body) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_newsletter_and_stats() {
        let (app, _) = test_app().await;

        let (status, body) =
            send_json(&app, post_json("/api/newsletter", json!({ "email": "nope" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Valid email is required");

        let (status, body) = send_json(
            &app,
            post_json("/api/newsletter", json!({ "email": "Parent@Example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Successfully subscribed to newsletter!");

        let (status, _) = send_json(
            &app,
            post_json("/api/newsletter", json!({ "email": "parent@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, stats) = send_json(&app, get("/api/stats")).await;
        assert_eq!(stats["activeSubscribers"], 1);

        let (status, _) = send_json(
            &app,
            post_json(
                "/api/newsletter/unsubscribe",
                json!({ "email": "parent@example.com" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send_json(
            &app,
            post_json(
                "/api/newsletter/unsubscribe",
                json!({ "email": "stranger@example.com" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, stats) = send_json(&app, get("/api/stats")).await;
        assert_eq!(stats["activeSubscribers"], 0);
        assert_eq!(stats["totalSchools"], 0);
    }

    #[tokio::test]
    async fn test_contact_and_cities() {
        let (app, _) = test_app().await;
        create_oak_hall(&app, None).await;

        let (status, body) = send_json(
            &app,
            post_json(
                "/api/contact",
                json!({ "name": "Ravi", "email": "ravi@example.com", "message": "Admissions?" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].is_number());

        let (status, _) = send_json(
            &app,
            post_json("/api/contact", json!({ "name": "Ravi", "email": "ravi@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, cities) = send_json(&app, get("/api/cities")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cities, json!(["Lucknow"]));
    }
}
