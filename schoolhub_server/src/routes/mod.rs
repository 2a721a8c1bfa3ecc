use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod contact;
pub mod newsletter;
pub mod reviews;
pub mod schools;
pub mod stats;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/schools",
            get(schools::list_handler).post(schools::create_handler),
        )
        .route(
            "/api/schools/{id}",
            get(schools::get_handler)
                .put(schools::update_handler)
                .delete(schools::delete_handler),
        )
        .route("/api/schools/{id}/reviews", get(reviews::list_handler))
        .route("/api/schools/{id}/review", post(reviews::submit_handler))
        .route("/api/cities", get(schools::cities_handler))
        .route("/api/newsletter", post(newsletter::subscribe_handler))
        .route(
            "/api/newsletter/unsubscribe",
            post(newsletter::unsubscribe_handler),
        )
        .route("/api/contact", post(contact::submit_handler))
        .route("/api/stats", get(stats::summary_handler))
}
