//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};
use std::net::IpAddr;

/// An in-memory representation of a resolution, queued for recording.
///
/// Created when a shortcode resolves and sent over a bounded channel, so the
/// redirect response never waits on the store write or the location lookup.
///
/// # Usage Flow
///
/// 1. Created by [`crate::application::services::LinkService::resolve`]
/// 2. Sent to the click queue (non-blocking)
/// 3. Processed by [`crate::domain::click_worker::run_click_worker`]
/// 4. Appended through [`crate::application::services::ClickRecorder::record_click`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub code: String,
    /// When the redirect happened; the stored click carries this time, not the write time.
    pub clicked_at: DateTime<Utc>,
    pub referrer: Option<String>,
    pub client_ip: Option<IpAddr>,
}

impl ClickEvent {
    pub fn new(
        code: impl Into<String>,
        clicked_at: DateTime<Utc>,
        referrer: Option<&str>,
        client_ip: Option<IpAddr>,
    ) -> Self {
        Self {
            code: code.into(),
            clicked_at,
            referrer: referrer
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            client_ip,
        }
    }
}

/// Request-side facts about a resolution, supplied by the redirect handler.
#[derive(Debug, Clone, Default)]
pub struct Visit<'a> {
    pub referrer: Option<&'a str>,
    pub client_ip: Option<IpAddr>,
}
