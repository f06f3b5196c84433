//! No-op location resolver.

use async_trait::async_trait;
use std::net::IpAddr;
use tracing::debug;

use super::resolver::LocationResolver;

/// A resolver that never knows where a client is.
///
/// Used when `GEOIP_API_URL` is not configured, and in tests.
pub struct NullLocationResolver;

impl NullLocationResolver {
    pub fn new() -> Self {
        debug!("Using NullLocationResolver (location lookup disabled)");
        Self
    }
}

impl Default for NullLocationResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocationResolver for NullLocationResolver {
    async fn resolve(&self, _ip: IpAddr) -> Option<String> {
        None
    }

    fn name(&self) -> &'static str {
        "Null"
    }
}
