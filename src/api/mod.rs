//! HTTP surface of the shortener.
//!
//! Handlers stay thin: they decode the request, hand it to the services in
//! [`crate::application`], and map the result or [`crate::error::AppError`]
//! onto a status code and JSON body.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
