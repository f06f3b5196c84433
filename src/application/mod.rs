//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::LinkRepository`] contract
//! and expose the operations HTTP handlers and the admin CLI call into.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Create, resolve, stats read, click append
//! - [`services::stats_service::StatsService`] - Per-link click statistics

pub mod services;
