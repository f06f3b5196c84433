//! Handler for per-link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Retrieves statistics for a short link.
///
/// # Endpoint
///
/// `GET /shorturls/{code}`
///
/// # Response
///
/// ```json
/// {
///   "shortcode": "abcd",
///   "originalUrl": "https://example.com",
///   "createdAt": "2026-03-01T12:00:00Z",
///   "expiry": "2026-03-01T12:30:00Z",
///   "totalClicks": 1,
///   "clicks": [
///     {"timestamp": "2026-03-01T12:05:00Z", "referrer": null, "location": "Paris, FR"}
///   ]
/// }
/// ```
///
/// Expired links keep returning their statistics.
///
/// # Errors
///
/// Returns 404 Not Found if the short code was never created.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.stats_service.get_stats(&code).await?;

    Ok(Json(StatsResponse::from(stats)))
}
