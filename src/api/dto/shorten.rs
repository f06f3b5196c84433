//! DTOs for link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::AppError;
use crate::utils::code_generator::SHORTCODE_REGEX;

/// Request to shorten a URL.
///
/// A missing `url` is treated as an empty one so it fails as an invalid URL
/// rather than as a malformed body.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten (must be absolute HTTP/HTTPS).
    #[serde(default)]
    #[validate(url(message = "not an absolute URL"))]
    pub url: String,

    /// Optional validity in minutes. Kept as raw JSON so that non-integer
    /// values are reported as an invalid validity.
    #[serde(default)]
    pub validity: Option<Value>,

    /// Optional custom short code (4-10 alphanumeric characters).
    #[validate(regex(path = "*SHORTCODE_REGEX"))]
    pub shortcode: Option<String>,
}

impl ShortenRequest {
    /// Returns the validity as whole minutes, `None` when omitted or `null`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidValidity`] for anything but a positive integer.
    pub fn validity_minutes(&self) -> Result<Option<i64>, AppError> {
        match &self.validity {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(minutes) if minutes > 0 => Ok(Some(minutes)),
                Some(minutes) => Err(AppError::InvalidValidity {
                    validity: Some(minutes),
                }),
                None => Err(AppError::InvalidValidity { validity: None }),
            },
            Some(_) => Err(AppError::InvalidValidity { validity: None }),
        }
    }
}

/// Created short link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_link: String,
    pub shortcode: String,
    pub expiry: DateTime<Utc>,
}
