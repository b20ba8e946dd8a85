//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into account operations and wraps
//! every result in the shared response envelope.
//!
//! # Modules
//!
//! - [`dto`] - Request/response bodies and the envelope
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Authentication, rate limiting and tracing
//! - [`routes`] - Route configuration and composition
//! - [`session`] - Session cookie and token extractors

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session;
