//! Location lookup for recorded clicks.
//!
//! Provides a [`LocationResolver`] trait with two implementations:
//! - [`ExternalApiLocationResolver`] - HTTP lookup against a GeoIP API
//! - [`NullLocationResolver`] - Resolves nothing, clicks carry no location

mod external_api;
mod null_resolver;
mod resolver;

pub use external_api::{ExternalApiLocationResolver, IP_PLACEHOLDER};
pub use null_resolver::NullLocationResolver;
pub use resolver::LocationResolver;

#[cfg(test)]
pub use resolver::MockLocationResolver;
