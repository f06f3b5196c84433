//! Shortcode lifecycle service: creation, resolution, stats reads and click appends.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, warn};

use crate::domain::click_event::{ClickEvent, Visit};
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::entities::{Click, Link, LinkRecord, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::ShortcodeGenerator;
use crate::utils::url_validator::validate_url;

/// Attempts made to find an unused generated code before giving up.
pub const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Validity applied when the caller does not supply one.
pub const DEFAULT_VALIDITY_MINUTES: i64 = 30;

/// Codes that collide with fixed routes and can never be claimed.
const RESERVED_CODES: &[&str] = &["health", "shorturls"];

/// Service-level settings taken from configuration.
#[derive(Debug, Clone)]
pub struct LinkSettings {
    /// Public base address short links are built from, e.g. `https://s.example.com`.
    pub base_url: String,
    pub default_validity_minutes: i64,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            default_validity_minutes: DEFAULT_VALIDITY_MINUTES,
        }
    }
}

/// Input for [`LinkService::create`].
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    pub original_url: String,
    pub validity_minutes: Option<i64>,
    pub custom_code: Option<String>,
}

/// Store-side half of click handling.
///
/// Holds no queue sender, so the click worker can own one without keeping the
/// queue it drains open.
#[derive(Clone)]
pub struct ClickRecorder {
    repository: Arc<dyn LinkRepository>,
}

impl ClickRecorder {
    pub fn new(repository: Arc<dyn LinkRepository>) -> Self {
        Self { repository }
    }

    /// Appends one click, stamped with the time of its redirect.
    ///
    /// Every call appends exactly one record; concurrent calls for the same code
    /// are all preserved because the append is atomic at the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code was never created.
    /// Returns [`AppError::StoreUnavailable`] on storage failures.
    pub async fn record_click(
        &self,
        code: &str,
        clicked_at: DateTime<Utc>,
        referrer: Option<String>,
        location: Option<String>,
    ) -> Result<(), AppError> {
        let click = Click::new(clicked_at, referrer, location);
        self.repository.append_click(code, click).await
    }
}

/// Service for the shortcode lifecycle.
///
/// Owns validation, code assignment, expiry enforcement and click dispatch.
/// Uniqueness is never pre-checked: the store's atomic insert-if-absent is the
/// arbiter, so two racing creates for one code cannot both succeed.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    generator: ShortcodeGenerator,
    clock: Arc<dyn Clock>,
    click_sender: mpsc::Sender<ClickEvent>,
    settings: LinkSettings,
}

impl LinkService {
    /// Creates a new link service using the system clock and default code length.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        click_sender: mpsc::Sender<ClickEvent>,
        settings: LinkSettings,
    ) -> Self {
        Self {
            repository,
            generator: ShortcodeGenerator::default(),
            clock: Arc::new(SystemClock),
            click_sender,
            settings,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_generator(mut self, generator: ShortcodeGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Creates and persists a short link.
    ///
    /// Validation happens before any store interaction, in this order: URL,
    /// custom shortcode, validity. Expiry is creation time plus the validity.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if the URL is not an absolute http(s) URL
    /// - [`AppError::InvalidShortcode`] if the custom code is malformed or reserved
    /// - [`AppError::InvalidValidity`] if the validity is not a positive minute count
    /// - [`AppError::ShortcodeTaken`] if the custom code is held by any record
    /// - [`AppError::GenerationExhausted`] if no free code was found in
    ///   [`MAX_GENERATION_ATTEMPTS`] tries
    /// - [`AppError::StoreUnavailable`] on storage failures
    pub async fn create(&self, request: CreateLink) -> Result<Link, AppError> {
        validate_url(&request.original_url).map_err(|e| AppError::invalid_url(e.to_string()))?;

        if let Some(code) = &request.custom_code {
            if !ShortcodeGenerator::validate(code) || is_reserved(code) {
                return Err(AppError::InvalidShortcode {
                    shortcode: code.clone(),
                });
            }
        }

        let validity = request
            .validity_minutes
            .unwrap_or(self.settings.default_validity_minutes);
        let created_at = self.clock.now();
        let expiry = expiry_after(created_at, validity)?;

        let link = match request.custom_code {
            Some(code) => {
                self.insert_custom(code, request.original_url, created_at, expiry)
                    .await?
            }
            None => {
                self.insert_generated(request.original_url, created_at, expiry)
                    .await?
            }
        };

        counter!("links_created_total").increment(1);
        debug!(code = %link.code, expiry = %link.expiry, "Short link created");

        Ok(link)
    }

    /// Resolves a shortcode to its original URL and queues a click.
    ///
    /// The decision is made from a single read. The click is handed to the
    /// click queue without waiting for the store write.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code was never created
    /// - [`AppError::Expired`] if the current time is past the link's expiry
    /// - [`AppError::StoreUnavailable`] on storage failures
    pub async fn resolve(&self, code: &str, visit: Visit<'_>) -> Result<String, AppError> {
        if !ShortcodeGenerator::validate(code) {
            return Err(not_found(code));
        }

        let link = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| not_found(code))?;

        let now = self.clock.now();
        if link.is_expired_at(now) {
            return Err(AppError::Expired {
                shortcode: link.code,
            });
        }

        self.dispatch_click(ClickEvent::new(
            link.code.as_str(),
            now,
            visit.referrer,
            visit.client_ip,
        ));

        Ok(link.original_url)
    }

    /// Returns the link and its full click history.
    ///
    /// Expiry is not applied: stats stay readable after a link stops resolving.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code was never created.
    /// Returns [`AppError::StoreUnavailable`] on storage failures.
    pub async fn get_stats(&self, code: &str) -> Result<LinkRecord, AppError> {
        if !ShortcodeGenerator::validate(code) {
            return Err(not_found(code));
        }

        self.repository
            .find_record(code)
            .await?
            .ok_or_else(|| not_found(code))
    }

    /// Appends one click to the link's history. See [`ClickRecorder::record_click`].
    pub async fn record_click(
        &self,
        code: &str,
        clicked_at: DateTime<Utc>,
        referrer: Option<String>,
        location: Option<String>,
    ) -> Result<(), AppError> {
        self.click_recorder()
            .record_click(code, clicked_at, referrer, location)
            .await
    }

    /// A recorder over the same store, without this service's queue sender.
    pub fn click_recorder(&self) -> ClickRecorder {
        ClickRecorder::new(Arc::clone(&self.repository))
    }

    /// Builds the public short link for a code.
    pub fn short_link(&self, code: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), code)
    }

    /// Checks the store behind this service.
    pub async fn ping_store(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    async fn insert_custom(
        &self,
        code: String,
        original_url: String,
        created_at: DateTime<Utc>,
        expiry: DateTime<Utc>,
    ) -> Result<Link, AppError> {
        let new_link = NewLink {
            code: code.clone(),
            original_url,
            created_at,
            expiry,
        };

        match self.repository.insert_if_absent(new_link.clone()).await {
            Ok(true) => Ok(Link::from(new_link)),
            Ok(false) | Err(AppError::ShortcodeTaken { .. }) => {
                Err(AppError::ShortcodeTaken { shortcode: code })
            }
            Err(e) => Err(e),
        }
    }

    /// Generates codes until the store accepts one.
    ///
    /// A rejected insert (or a late unique-constraint violation) counts as a
    /// collision and consumes one attempt.
    async fn insert_generated(
        &self,
        original_url: String,
        created_at: DateTime<Utc>,
        expiry: DateTime<Utc>,
    ) -> Result<Link, AppError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let code = self.generator.generate();
            if is_reserved(&code) {
                continue;
            }

            let new_link = NewLink {
                code,
                original_url: original_url.clone(),
                created_at,
                expiry,
            };

            match self.repository.insert_if_absent(new_link.clone()).await {
                Ok(true) => return Ok(Link::from(new_link)),
                Ok(false) | Err(AppError::ShortcodeTaken { .. }) => {
                    debug!(attempt, code = %new_link.code, "Generated shortcode collided");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = MAX_GENERATION_ATTEMPTS,
            "Gave up generating a unique shortcode"
        );

        Err(AppError::GenerationExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Hands a click to the queue without blocking the caller.
    ///
    /// A full queue defers the send to a spawned task instead of dropping it.
    fn dispatch_click(&self, event: ClickEvent) {
        match self.click_sender.try_send(event) {
            Ok(()) => {
                counter!("clicks_dispatched_total").increment(1);
            }
            Err(TrySendError::Full(event)) => {
                counter!("clicks_queue_full_total").increment(1);
                warn!(code = %event.code, "Click queue full, deferring click");

                let sender = self.click_sender.clone();
                tokio::spawn(async move {
                    let code = event.code.clone();
                    if sender.send(event).await.is_err() {
                        error!(%code, "Click queue closed, click not recorded");
                    }
                });
            }
            Err(TrySendError::Closed(event)) => {
                counter!("clicks_failed_total").increment(1);
                error!(code = %event.code, "Click queue closed, click not recorded");
            }
        }
    }
}

fn not_found(code: &str) -> AppError {
    AppError::NotFound {
        shortcode: code.to_string(),
    }
}

fn is_reserved(code: &str) -> bool {
    RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
}

/// Computes `created_at + validity` minutes.
///
/// Rejects non-positive validities and ones whose expiry is not representable.
fn expiry_after(created_at: DateTime<Utc>, validity: i64) -> Result<DateTime<Utc>, AppError> {
    if validity <= 0 {
        return Err(AppError::InvalidValidity {
            validity: Some(validity),
        });
    }

    Duration::try_minutes(validity)
        .and_then(|d| created_at.checked_add_signed(d))
        .ok_or(AppError::InvalidValidity {
            validity: Some(validity),
        })
}
