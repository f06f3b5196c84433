//! Location resolver trait.

use async_trait::async_trait;
use std::net::IpAddr;

/// Maps a client address to a coarse, human-readable location.
///
/// Lookups are best effort: a resolver never fails a click, it returns `None`
/// when it cannot tell.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Returns the location of `ip`, e.g. `"Paris, FR"`.
    async fn resolve(&self, ip: IpAddr) -> Option<String>;

    /// Resolver name for logs.
    fn name(&self) -> &'static str;
}
