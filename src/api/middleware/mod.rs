//! Tower middleware wrapped around the API routes.
//!
//! - [`auth`] resolves the caller from the session cookie or Bearer header
//! - [`rate_limit`] throttles per peer IP
//! - [`tracing`] opens a span per request

pub mod auth;
pub mod rate_limit;
pub mod tracing;
