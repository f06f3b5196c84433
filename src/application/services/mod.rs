//! Business logic services for the application layer.

pub mod link_service;
pub mod stats_service;

pub use link_service::{ClickRecorder, CreateLink, LinkService, LinkSettings};
pub use stats_service::{LinkStats, StatsService};
