//! # weatherbox-domain
//!
//! Pure domain model for the weatherbox ambient weather display.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, service configuration
//! - Define **sensor readings** (named numeric/string fields)
//! - Define **condition keys** (sky state × temperature bucket)
//! - Define **animation programs** (timed, opaque LED strip commands)
//! - Hold the static **animation catalog** and its palette
//! - Define the **control surface** vocabulary (`start` / `stop` + status)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;

pub mod animation;
pub mod catalog;
pub mod condition;
pub mod config;
pub mod control;
pub mod reading;
