//! Virtual weather sensor — replays a scripted list of readings.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::Deserialize;

use weatherbox_app::ports::WeatherSensor;
use weatherbox_domain::error::WeatherboxError;
use weatherbox_domain::reading::SensorReading;

use crate::error::VirtualDeviceError;

/// Declarative description of a virtual sensor, as found in config files.
///
/// ```toml
/// [[devices.sensors]]
/// name = "weather"
/// readings = [{ code = 1000, outside_f = 70.0 }]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VirtualSensorConfig {
    pub name: String,
    /// Readings returned in order, wrapping around after the last one.
    pub readings: Vec<SensorReading>,
    /// Start with the sensor failing every read.
    pub offline: bool,
}

/// A simulated weather sensor.
///
/// Each read returns the next scripted reading; after the last one it
/// starts over from the first.
pub struct VirtualWeatherSensor {
    name: String,
    readings: Vec<SensorReading>,
    cursor: AtomicUsize,
    offline: AtomicBool,
}

impl VirtualWeatherSensor {
    #[must_use]
    pub fn new(name: impl Into<String>, readings: Vec<SensorReading>) -> Self {
        Self {
            name: name.into(),
            readings,
            cursor: AtomicUsize::new(0),
            offline: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn from_config(config: &VirtualSensorConfig) -> Self {
        let sensor = Self::new(config.name.clone(), config.readings.clone());
        sensor.set_offline(config.offline);
        sensor
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Make every subsequent read fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// How many successful reads have been served.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    fn next_reading(&self) -> Result<SensorReading, VirtualDeviceError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(VirtualDeviceError::Offline {
                name: self.name.clone(),
            });
        }
        if self.readings.is_empty() {
            return Err(VirtualDeviceError::NoReadings {
                name: self.name.clone(),
            });
        }
        let index = self.cursor.fetch_add(1, Ordering::SeqCst) % self.readings.len();
        Ok(self.readings[index].clone())
    }
}

impl WeatherSensor for VirtualWeatherSensor {
    async fn read(&self) -> Result<SensorReading, WeatherboxError> {
        let reading = self.next_reading()?;
        tracing::debug!(sensor = %self.name, fields = reading.len(), "virtual reading");
        Ok(reading)
    }
}
