//! Syntactic checks for original URLs.
//!
//! Only well-formedness is checked: the URL must parse as absolute, use the
//! `http` or `https` scheme, and name a host. The stored value is the caller's
//! string unchanged, so a redirect always lands exactly where the caller asked.

use url::Url;

/// Errors that can occur while checking a URL.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Checks that `input` is an absolute `http`/`https` URL with a host.
///
/// # Errors
///
/// Returns [`UrlValidationError::InvalidFormat`] for strings that do not parse,
/// including relative references such as `not-a-url` or `/path`.
/// Returns [`UrlValidationError::UnsupportedProtocol`] for other schemes
/// (`javascript:`, `data:`, `ftp:` ...).
/// Returns [`UrlValidationError::MissingHost`] when no host is present.
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}
