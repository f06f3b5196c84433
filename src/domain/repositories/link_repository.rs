//! Repository trait for link records and click histories.

use crate::domain::entities::{Click, Link, LinkRecord, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Store contract for link records.
///
/// Implementations must make [`LinkRepository::insert_if_absent`] and
/// [`LinkRepository::append_click`] atomic with respect to each other and to
/// concurrent callers. Reads never lock out writers; they observe a snapshot.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - Sharded in-process map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts the link unless its shortcode is already held.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the link was stored
    /// - `Ok(false)` if any record, expired or not, already holds the code
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on storage failures.
    async fn insert_if_absent(&self, new_link: NewLink) -> Result<bool, AppError>;

    /// Finds a link by its shortcode, without its clicks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on storage failures.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link together with its clicks in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on storage failures.
    async fn find_record(&self, code: &str) -> Result<Option<LinkRecord>, AppError>;

    /// Appends one click to the link's history.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link holds `code`.
    /// Returns [`AppError::StoreUnavailable`] on storage failures.
    async fn append_click(&self, code: &str, click: Click) -> Result<(), AppError>;

    /// Checks that the backing store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if it is not.
    async fn ping(&self) -> Result<(), AppError>;
}
