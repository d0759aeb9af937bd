//! LED strip port — the actuator animations are played on.

use std::future::Future;
use std::sync::Arc;

use weatherbox_domain::error::WeatherboxError;

/// An addressable LED strip accepting opaque structured commands.
///
/// The command document is produced by the animation catalog; the core
/// passes it through untouched. Implementations are not expected to cope
/// with interleaved commands from two animations.
pub trait LedStrip: Send + Sync {
    /// Send one command to the strip.
    fn execute(
        &self,
        command: &serde_json::Value,
    ) -> impl Future<Output = Result<(), WeatherboxError>> + Send;
}

impl<T: LedStrip> LedStrip for Arc<T> {
    fn execute(
        &self,
        command: &serde_json::Value,
    ) -> impl Future<Output = Result<(), WeatherboxError>> + Send {
        (**self).execute(command)
    }
}
