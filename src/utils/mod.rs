//! Utility functions for code generation, URL checks, and request handling.
//!
//! - [`code_generator`] - Shortcode generation and validation
//! - [`url_validator`] - Well-formedness check for original URLs
//! - [`client_ip`] - Client address extraction from connection info and proxy headers
//! - [`db_error`] - PostgreSQL error classification

pub mod client_ip;
pub mod code_generator;
pub mod db_error;
pub mod url_validator;
