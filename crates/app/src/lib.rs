//! # weatherbox-app
//!
//! Application layer — the scheduling core and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `WeatherSensor` — produce one reading on request
//!   - `LedStrip` — accept one opaque animation command
//!   - `DeviceRegistry` — resolve configured names to device handles
//! - Classify readings into condition keys (`ConditionClassifier`)
//! - Play animation programs under cooperative cancellation (`AnimationPlayer`)
//! - Poll, classify and dispatch on an interval (`PollingLoop`, `Dispatcher`)
//! - Expose the **driving/inbound** lifecycle surface (`WeatherScheduler`):
//!   start, stop, reconfigure, shutdown
//!
//! ## Dependency rule
//! Depends on `weatherbox-domain` only (plus `tokio` / `tokio-util` for tasks
//! and cancellation). Never imports adapter crates. Adapters depend on *this*
//! crate, not the reverse.

pub mod classifier;
pub mod dispatcher;
pub mod player;
pub mod polling;
pub mod ports;
pub mod scheduler;

#[cfg(test)]
mod test_support;
