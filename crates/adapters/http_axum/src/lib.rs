//! # silvanus-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON API** polled by the garden web client
//!   (`/system/settings`, `/status`, `/light`, `/auto-light`)
//! - Map HTTP requests into settings-service calls and controller commands
//!   (driving adapter)
//! - Map domain errors into HTTP status codes with a `{"error": ...}` body
//!
//! ## Dependency rule
//! Depends on `silvanus-app` (for port traits, services and the controller
//! handle) and `silvanus-domain` (for request/response types). Never leaks
//! axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod test_support;
