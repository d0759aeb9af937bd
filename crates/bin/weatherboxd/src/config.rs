//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `weatherbox.toml` in the working directory. Every section has a
//! default so the file is optional; a `[service]` section that is present
//! must name all three of its attributes. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use weatherbox_adapter_virtual::VirtualDevicesConfig;
use weatherbox_app::dispatcher::RestartPolicy;
use weatherbox_domain::condition::Thresholds;
use weatherbox_domain::config::ServiceConfig;
use weatherbox_domain::error::ValidationError;

const CONFIG_FILE: &str = "weatherbox.toml";

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// The weather service itself: interval, sensor and LED strip names.
    pub service: ServiceConfig,
    /// Scheduling behaviour.
    pub scheduler: SchedulerConfig,
    /// Virtual devices available to the service.
    pub devices: VirtualDevicesConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Scheduler tuning.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// `"on_change"` (default) or `"always"`.
    pub restart_policy: RestartPolicy,
    /// Temperatures at or above this are hot (°F).
    pub hot_threshold_f: f64,
    /// Temperatures at or below this are cold (°F).
    pub cold_threshold_f: f64,
    /// Start polling as soon as the daemon is up.
    pub autostart: bool,
}

impl Config {
    /// Load configuration from `weatherbox.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(CONFIG_FILE)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("WEATHERBOX_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("WEATHERBOX_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("WEATHERBOX_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("WEATHERBOX_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(secs) = var("WEATHERBOX_REFRESH_INTERVAL").and_then(|val| val.parse().ok()) {
            self.service.refresh_interval_secs = secs;
        }
        if let Some(val) = var("WEATHERBOX_WEATHER_SENSOR") {
            self.service.weather_sensor = val;
        }
        if let Some(val) = var("WEATHERBOX_LED_COMPONENT") {
            self.service.led_component = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.scheduler.cold_threshold_f >= self.scheduler.hot_threshold_f {
            return Err(ConfigError::Validation(
                "cold_threshold_f must be below hot_threshold_f".to_string(),
            ));
        }
        self.service.validate()?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl SchedulerConfig {
    #[must_use]
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            hot: self.hot_threshold_f,
            cold: self.cold_threshold_f,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            service: ServiceConfig::new(60, "weather", "led"),
            scheduler: SchedulerConfig::default(),
            devices: VirtualDevicesConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "weatherboxd=info,weatherbox=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            restart_policy: RestartPolicy::default(),
            hot_threshold_f: Thresholds::DEFAULT_HOT_F,
            cold_threshold_f: Thresholds::DEFAULT_COLD_F,
            autostart: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// The `[service]` section is incomplete.
    #[error("invalid service configuration: {0}")]
    Service(#[from] ValidationError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
