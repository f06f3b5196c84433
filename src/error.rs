//! Application error taxonomy and its HTTP mapping.
//!
//! Every failure in the shortcode lifecycle is one [`AppError`] variant. Handlers
//! return `Result<_, AppError>` and the [`IntoResponse`] impl turns the variant
//! into a status code plus a discriminated JSON body:
//!
//! ```json
//! { "error": "Shortcode is already taken", "code": "shortcode_taken", "details": { "shortcode": "abcd" } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use validator::ValidationErrors;

/// Errors produced by the link lifecycle services and their store adapters.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The original URL is not an absolute `http`/`https` URL.
    #[error("Invalid URL: {reason}")]
    InvalidUrl { reason: String },

    /// A custom shortcode does not match `^[a-zA-Z0-9]{4,10}$`.
    #[error("Shortcode must be 4-10 alphanumeric characters")]
    InvalidShortcode { shortcode: String },

    /// The validity is not a positive number of minutes.
    #[error("Validity must be a positive integer number of minutes")]
    InvalidValidity { validity: Option<i64> },

    /// The request body could not be decoded.
    #[error("Malformed request: {reason}")]
    InvalidRequest { reason: String },

    /// Another record (expired or not) already holds the shortcode.
    #[error("Shortcode is already taken")]
    ShortcodeTaken { shortcode: String },

    /// No unused shortcode was found within the retry budget.
    #[error("Failed to generate a unique shortcode after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    #[error("Short link not found")]
    NotFound { shortcode: String },

    #[error("Short link has expired")]
    Expired { shortcode: String },

    /// Any persistence-layer failure. The cause is logged, never returned.
    #[error("Storage is unavailable")]
    StoreUnavailable { cause: String },
}

/// Machine-readable error descriptor shared by the HTTP body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub error: String,
    pub code: &'static str,
    pub details: Value,
}

impl AppError {
    pub fn invalid_url(reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            reason: reason.into(),
        }
    }

    pub fn store(cause: impl std::fmt::Display) -> Self {
        Self::StoreUnavailable {
            cause: cause.to_string(),
        }
    }

    /// Stable snake_case discriminator for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidUrl { .. } => "invalid_url",
            AppError::InvalidShortcode { .. } => "invalid_shortcode",
            AppError::InvalidValidity { .. } => "invalid_validity",
            AppError::InvalidRequest { .. } => "invalid_request",
            AppError::ShortcodeTaken { .. } => "shortcode_taken",
            AppError::GenerationExhausted { .. } => "generation_exhausted",
            AppError::NotFound { .. } => "not_found",
            AppError::Expired { .. } => "expired",
            AppError::StoreUnavailable { .. } => "store_unavailable",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl { .. }
            | AppError::InvalidShortcode { .. }
            | AppError::InvalidValidity { .. }
            | AppError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::ShortcodeTaken { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Expired { .. } => StatusCode::GONE,
            AppError::GenerationExhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn details(&self) -> Value {
        match self {
            AppError::InvalidUrl { reason } | AppError::InvalidRequest { reason } => {
                json!({ "reason": reason })
            }
            AppError::InvalidShortcode { shortcode }
            | AppError::ShortcodeTaken { shortcode }
            | AppError::NotFound { shortcode }
            | AppError::Expired { shortcode } => json!({ "shortcode": shortcode }),
            AppError::InvalidValidity { validity } => json!({ "validity": validity }),
            AppError::GenerationExhausted { attempts } => json!({ "attempts": attempts }),
            AppError::StoreUnavailable { .. } => json!({}),
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            error: self.to_string(),
            code: self.code(),
            details: self.details(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::StoreUnavailable { cause } = &self {
            tracing::error!(error = %cause, "Store failure");
        }

        (self.status(), Json(self.to_error_info())).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if crate::utils::db_error::is_unique_violation_on_code(&e) {
            return AppError::ShortcodeTaken {
                shortcode: String::new(),
            };
        }

        AppError::store(e)
    }
}

/// Maps DTO validation failures onto the validation taxonomy.
///
/// Fields are checked in the same order the service validates them: URL, then
/// shortcode, then validity.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors.field_errors();

        if let Some(errs) = fields.get("url") {
            let reason = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "not an absolute URL".to_string());
            return AppError::InvalidUrl { reason };
        }

        if let Some(errs) = fields.get("shortcode") {
            let shortcode = errs
                .first()
                .and_then(|e| e.params.get("value"))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            return AppError::InvalidShortcode { shortcode };
        }

        if let Some(errs) = fields.get("validity") {
            let validity = errs
                .first()
                .and_then(|e| e.params.get("value"))
                .and_then(|v| v.as_i64());
            return AppError::InvalidValidity { validity };
        }

        AppError::InvalidRequest {
            reason: errors.to_string(),
        }
    }
}
