//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the core and the adapter
//! layer can depend on them without creating circular dependencies.

pub mod led_strip;
pub mod registry;
pub mod weather_sensor;

pub use led_strip::LedStrip;
pub use registry::DeviceRegistry;
pub use weather_sensor::WeatherSensor;
