//! API route configuration.

use crate::api::handlers::{shorten_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Short link management routes.
///
/// # Endpoints
///
/// - `POST /shorturls`        - Create a short link
/// - `GET  /shorturls/{code}` - Statistics for a short link
pub fn shorturl_routes() -> Router<AppState> {
    Router::new()
        .route("/shorturls", post(shorten_handler))
        .route("/shorturls/{code}", get(stats_handler))
}
