//! Virtual adapter error types.

use weatherbox_domain::error::WeatherboxError;

/// Errors reported by virtual devices.
#[derive(Debug, thiserror::Error)]
pub enum VirtualDeviceError {
    /// The device was configured (or switched) offline.
    #[error("virtual device {name:?} is offline")]
    Offline { name: String },

    /// A sensor was configured without any scripted reading.
    #[error("virtual sensor {name:?} has no scripted readings")]
    NoReadings { name: String },
}

impl VirtualDeviceError {
    /// Convert into a [`WeatherboxError::Device`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> WeatherboxError {
        WeatherboxError::device(self)
    }
}

impl From<VirtualDeviceError> for WeatherboxError {
    fn from(err: VirtualDeviceError) -> Self {
        err.into_domain()
    }
}
