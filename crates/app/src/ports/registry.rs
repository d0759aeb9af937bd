//! Device registry port — resolves configured names to device handles.

use std::sync::Arc;

use weatherbox_domain::error::NotFoundError;

use super::{LedStrip, WeatherSensor};

/// Resolves the sensor and LED strip named in a
/// [`ServiceConfig`](weatherbox_domain::config::ServiceConfig).
///
/// Resolution happens at construction and reconfiguration time only; a
/// failure there is fatal for that call and carries the missing name.
pub trait DeviceRegistry {
    type Sensor: WeatherSensor + 'static;
    type Strip: LedStrip + 'static;

    /// Look up a weather sensor by name.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no sensor is registered under `name`.
    fn weather_sensor(&self, name: &str) -> Result<Arc<Self::Sensor>, NotFoundError>;

    /// Look up an LED strip by name.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no strip is registered under `name`.
    fn led_strip(&self, name: &str) -> Result<Arc<Self::Strip>, NotFoundError>;
}
