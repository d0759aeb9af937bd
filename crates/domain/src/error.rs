//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`WeatherboxError`] via `#[from]` or an explicit `into_domain`.

/// Top-level error shared by the domain, the application core and adapters.
#[derive(Debug, thiserror::Error)]
pub enum WeatherboxError {
    /// A value failed a domain invariant (bad config, empty program, …).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A named dependency (sensor, LED strip, …) could not be resolved.
    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    /// A device (sensor or actuator) reported a failure.
    #[error("device error: {0}")]
    Device(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// `refresh_interval_secs` is zero or missing.
    #[error(r#"expected "refresh-interval" attribute for weather service"#)]
    MissingRefreshInterval,

    /// `weather_sensor` is empty or missing.
    #[error(r#"expected "weather-sensor" attribute for weather service"#)]
    MissingWeatherSensor,

    /// `led_component` is empty or missing.
    #[error(r#"expected "led-component" attribute for weather service"#)]
    MissingLedComponent,

    /// An animation program has no steps.
    #[error("animation program must contain at least one step")]
    EmptyProgram,

    /// Every step of an animation program lasts zero time.
    #[error("animation program must last longer than zero")]
    ZeroLengthProgram,

    /// A condition key was empty.
    #[error("condition key must not be empty")]
    EmptyConditionKey,
}

/// A named dependency that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unable to get {kind} {name:?} for service")]
pub struct NotFoundError {
    /// What kind of dependency was requested (e.g. `"weather sensor"`).
    pub kind: &'static str,
    /// The identifier that failed to resolve.
    pub name: String,
}

impl WeatherboxError {
    /// Wrap any device-level error.
    pub fn device<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Device(Box::new(err))
    }
}
