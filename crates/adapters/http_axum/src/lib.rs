//! # weatherbox-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **control surface** as JSON:
//!   - `POST /api/command` — `{"state": "start" | "stop"}`
//!   - `GET  /api/status`  — running flag, start time, active configuration
//!   - `PUT  /api/config`  — replace the service configuration
//! - Map HTTP requests into scheduler calls (driving adapter)
//! - Map scheduler results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `weatherbox-app` (for the scheduler and port traits) and
//! `weatherbox-domain` (for request/response types). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod test_support;
