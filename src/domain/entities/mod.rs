//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Link`] - A shortcode mapped to its original URL with an expiry
//! - [`Click`] - One recorded resolution of a shortcode
//! - [`LinkRecord`] - A link together with its append-only click history
//!
//! `NewLink` is the creation input; links are never updated afterwards, and the
//! click history only grows.

pub mod click;
pub mod link;

pub use click::Click;
pub use link::{Link, LinkRecord, NewLink};
