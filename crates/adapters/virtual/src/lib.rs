//! # weatherbox-adapter-virtual
//!
//! Virtual devices for demos and tests: scripted weather sensors and LED
//! strips that log and record every command.
//!
//! ## Provided devices
//!
//! | Device | Port | Behaviour |
//! |--------|------|-----------|
//! | [`VirtualWeatherSensor`] | `WeatherSensor` | Replays scripted readings in a loop |
//! | [`VirtualLedStrip`] | `LedStrip` | Logs and records each command |
//!
//! [`VirtualRegistry`] resolves both by name for the scheduler.
//!
//! ## Dependency rule
//!
//! Depends on `weatherbox-app` (port traits) and `weatherbox-domain` only.

mod devices;
mod error;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use weatherbox_app::ports::DeviceRegistry;
use weatherbox_domain::error::NotFoundError;
use weatherbox_domain::reading::SensorReading;

pub use devices::{VirtualLedStrip, VirtualSensorConfig, VirtualStripConfig, VirtualWeatherSensor};
pub use error::VirtualDeviceError;

/// The `[devices]` section of the daemon configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VirtualDevicesConfig {
    pub sensors: Vec<VirtualSensorConfig>,
    pub led_strips: Vec<VirtualStripConfig>,
}

impl Default for VirtualDevicesConfig {
    /// A `weather` sensor cycling through a sunny, a cloudy and a rainy day,
    /// and a single `led` strip.
    fn default() -> Self {
        let reading = |code: i32, outside_f: f64| {
            SensorReading::new()
                .with("code", code)
                .with("outside_f", outside_f)
        };

        Self {
            sensors: vec![VirtualSensorConfig {
                name: "weather".to_string(),
                readings: vec![
                    reading(1000, 72.0),
                    reading(1009, 28.0),
                    reading(1189, 68.0),
                ],
                offline: false,
            }],
            led_strips: vec![VirtualStripConfig {
                name: "led".to_string(),
                ..VirtualStripConfig::default()
            }],
        }
    }
}

/// Name-indexed set of virtual devices.
#[derive(Default)]
pub struct VirtualRegistry {
    sensors: HashMap<String, Arc<VirtualWeatherSensor>>,
    strips: HashMap<String, Arc<VirtualLedStrip>>,
}

impl VirtualRegistry {
    /// Instantiate every device described in `config`.
    ///
    /// A later entry replaces an earlier one with the same name.
    #[must_use]
    pub fn from_config(config: &VirtualDevicesConfig) -> Self {
        let registry = config
            .sensors
            .iter()
            .fold(Self::default(), |registry, sensor| {
                registry.with_sensor(VirtualWeatherSensor::from_config(sensor))
            });
        config.led_strips.iter().fold(registry, |registry, strip| {
            registry.with_strip(VirtualLedStrip::from_config(strip))
        })
    }

    #[must_use]
    pub fn with_sensor(mut self, sensor: VirtualWeatherSensor) -> Self {
        self.sensors
            .insert(sensor.name().to_string(), Arc::new(sensor));
        self
    }

    #[must_use]
    pub fn with_strip(mut self, strip: VirtualLedStrip) -> Self {
        self.strips.insert(strip.name().to_string(), Arc::new(strip));
        self
    }

    /// Registered sensor names, sorted.
    #[must_use]
    pub fn sensor_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.sensors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered strip names, sorted.
    #[must_use]
    pub fn strip_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.strips.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl DeviceRegistry for VirtualRegistry {
    type Sensor = VirtualWeatherSensor;
    type Strip = VirtualLedStrip;

    fn weather_sensor(&self, name: &str) -> Result<Arc<VirtualWeatherSensor>, NotFoundError> {
        self.sensors.get(name).cloned().ok_or_else(|| NotFoundError {
            kind: "weather sensor",
            name: name.to_string(),
        })
    }

    fn led_strip(&self, name: &str) -> Result<Arc<VirtualLedStrip>, NotFoundError> {
        self.strips.get(name).cloned().ok_or_else(|| NotFoundError {
            kind: "led component",
            name: name.to_string(),
        })
    }
}
