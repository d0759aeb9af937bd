//! Service configuration — the three scalars the scheduler needs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Validated configuration for the weather animation service.
///
/// Replaced wholesale on reconfiguration, never patched field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Seconds between two sensor polls. Must be non-zero.
    #[serde(alias = "refresh-interval")]
    pub refresh_interval_secs: u64,
    /// Name of the weather sensor to read.
    #[serde(alias = "weather-sensor")]
    pub weather_sensor: String,
    /// Name of the LED strip to drive.
    #[serde(alias = "led-component")]
    pub led_component: String,
}

impl ServiceConfig {
    #[must_use]
    pub fn new(
        refresh_interval_secs: u64,
        weather_sensor: impl Into<String>,
        led_component: impl Into<String>,
    ) -> Self {
        Self {
            refresh_interval_secs,
            weather_sensor: weather_sensor.into(),
            led_component: led_component.into(),
        }
    }

    /// Check that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] naming the first missing attribute.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.refresh_interval_secs == 0 {
            return Err(ValidationError::MissingRefreshInterval);
        }
        if self.weather_sensor.trim().is_empty() {
            return Err(ValidationError::MissingWeatherSensor);
        }
        if self.led_component.trim().is_empty() {
            return Err(ValidationError::MissingLedComponent);
        }
        Ok(())
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}
