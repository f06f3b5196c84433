//! Domain layer containing business entities and contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Links, clicks and stored records
//! - [`repositories`] - The link store contract
//! - [`clock`] - Time source for creation, expiry and click timestamps
//! - [`click_event`] - Click tracking event model
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler receives redirect request
//! 2. [`click_event::ClickEvent`] is sent to a bounded channel
//! 3. [`click_worker::run_click_worker`] resolves the client location
//! 4. The click is appended via [`repositories::LinkRepository::append_click`]

pub mod click_event;
pub mod click_worker;
pub mod clock;
pub mod entities;
pub mod repositories;
