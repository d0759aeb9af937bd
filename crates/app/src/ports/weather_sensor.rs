//! Weather sensor port — the source of raw readings.

use std::future::Future;
use std::sync::Arc;

use weatherbox_domain::error::WeatherboxError;
use weatherbox_domain::reading::SensorReading;

/// A sensor producing named numeric/string fields on request.
///
/// The core needs two fields: `code` (a weather condition code) and
/// `outside_f` (outdoor temperature in °F). Anything else is logged and
/// ignored.
pub trait WeatherSensor: Send + Sync {
    /// Take one reading.
    fn read(&self) -> impl Future<Output = Result<SensorReading, WeatherboxError>> + Send;
}

impl<T: WeatherSensor> WeatherSensor for Arc<T> {
    fn read(&self) -> impl Future<Output = Result<SensorReading, WeatherboxError>> + Send {
        (**self).read()
    }
}
