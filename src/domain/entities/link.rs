//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

use super::click::Click;

/// A shortcode mapped to its original URL.
///
/// `created_at` and `expiry` are fixed at creation. Expiry is evaluated lazily
/// by readers; an expired link stays in the store and keeps its shortcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expiry: DateTime<Utc>,
}

impl Link {
    pub fn new(
        code: String,
        original_url: String,
        created_at: DateTime<Utc>,
        expiry: DateTime<Utc>,
    ) -> Self {
        Self {
            code,
            original_url,
            created_at,
            expiry,
        }
    }

    /// Returns true if the link no longer resolves at `now`.
    ///
    /// A link is still active at exactly its expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expiry
    }
}

impl From<NewLink> for Link {
    fn from(new_link: NewLink) -> Self {
        Link::new(
            new_link.code,
            new_link.original_url,
            new_link.created_at,
            new_link.expiry,
        )
    }
}

/// Input data for creating a new link.
///
/// Timestamps are assigned by the service clock, not by the store, so every
/// backend agrees on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expiry: DateTime<Utc>,
}

/// A link with its full click history in insertion order.
#[derive(Debug, Clone)]
pub struct LinkRecord {
    pub link: Link,
    pub clicks: Vec<Click>,
}
