//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete link stores and click location lookup.
//!
//! # Modules
//!
//! - [`location`] - Click location resolvers (GeoIP API and no-op implementations)
//! - [`persistence`] - PostgreSQL and in-memory repository implementations

pub mod location;
pub mod persistence;
