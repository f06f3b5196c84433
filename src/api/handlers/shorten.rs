//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::application::services::CreateLink;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /shorturls`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "validity": 30,      // optional, minutes
///   "shortcode": "abcd"  // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "shortLink": "https://s.example.com/abcd",
///   "shortcode": "abcd",
///   "expiry": "2026-03-01T12:30:00Z"
/// }
/// ```
///
/// # Errors
///
/// - 400 for an invalid URL, shortcode, validity or a malformed body
/// - 409 if the shortcode is already taken
/// - 500 if no free shortcode could be generated
/// - 503 if the store is unavailable
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| AppError::InvalidRequest {
        reason: rejection.body_text(),
    })?;

    payload.validate()?;
    let validity_minutes = payload.validity_minutes()?;

    let link = state
        .link_service
        .create(CreateLink {
            original_url: payload.url,
            validity_minutes,
            custom_code: payload.shortcode,
        })
        .await?;

    let response = ShortenResponse {
        short_link: state.link_service.short_link(&link.code),
        shortcode: link.code,
        expiry: link.expiry,
    };

    Ok((StatusCode::CREATED, Json(response)))
}
