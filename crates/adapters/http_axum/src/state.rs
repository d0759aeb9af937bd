//! Shared application state for axum handlers.

use std::sync::Arc;

use weatherbox_app::ports::DeviceRegistry;
use weatherbox_app::scheduler::WeatherScheduler;

/// Scheduler type driven by devices from registry `R`.
pub type RegistryScheduler<R> =
    WeatherScheduler<<R as DeviceRegistry>::Sensor, <R as DeviceRegistry>::Strip>;

/// Application state shared across all axum handlers.
///
/// Generic over the device registry to avoid dynamic dispatch. `Clone` is
/// implemented manually so that only the `Arc` wrappers are cloned.
pub struct AppState<R: DeviceRegistry> {
    /// The scheduler the control surface drives.
    pub scheduler: Arc<RegistryScheduler<R>>,
    /// Registry used to resolve devices on reconfiguration.
    pub registry: Arc<R>,
}

impl<R: DeviceRegistry> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            scheduler: Arc::clone(&self.scheduler),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<R> AppState<R>
where
    R: DeviceRegistry + Send + Sync + 'static,
{
    pub fn new(scheduler: RegistryScheduler<R>, registry: R) -> Self {
        Self::from_arcs(Arc::new(scheduler), Arc::new(registry))
    }

    /// Create the state from pre-wrapped `Arc`s.
    ///
    /// Use this when the scheduler must also be reachable outside the HTTP
    /// layer, e.g. to shut it down once the server has stopped.
    pub fn from_arcs(scheduler: Arc<RegistryScheduler<R>>, registry: Arc<R>) -> Self {
        Self {
            scheduler,
            registry,
        }
    }
}
