//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use metrics::counter;
use std::net::SocketAddr;

use crate::domain::click_event::Visit;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code (single store read, expiry checked against the clock)
/// 2. Queue a click event with the `Referer` header and client IP
/// 3. Return 302 Found
///
/// The redirect never waits for the click to be written. 302 is used instead
/// of 301 so browsers do not cache the mapping past its expiry.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 410 Gone if the short code has expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let visit = Visit {
        referrer: headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
        client_ip: Some(client_ip(&headers, addr, state.behind_proxy)),
    };

    match state.link_service.resolve(&code, visit).await {
        Ok(original_url) => {
            counter!("redirects_total", "outcome" => "found").increment(1);
            Ok((StatusCode::FOUND, [(header::LOCATION, original_url)]).into_response())
        }
        Err(err) => {
            counter!("redirects_total", "outcome" => err.code()).increment(1);
            Err(err)
        }
    }
}
