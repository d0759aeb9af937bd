//! Virtual device implementations — scripted sensor, recording LED strip.

mod sensor;
mod strip;

pub use sensor::{VirtualSensorConfig, VirtualWeatherSensor};
pub use strip::{VirtualLedStrip, VirtualStripConfig};
