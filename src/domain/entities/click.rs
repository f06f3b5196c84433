//! Click entity representing a single redirect event.

use chrono::{DateTime, Utc};

/// A click recorded when a shortcode resolves successfully.
///
/// Once appended to a link's history a click is never modified or removed.
/// `referrer` and `location` are absent when the client sent no `Referer`
/// header or the location collaborator could not place the address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Click {
    pub timestamp: DateTime<Utc>,
    pub referrer: Option<String>,
    pub location: Option<String>,
}

impl Click {
    pub fn new(
        timestamp: DateTime<Utc>,
        referrer: Option<String>,
        location: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            referrer,
            location,
        }
    }
}
