//! Polling loop — reads the sensor on a fixed interval and dispatches the
//! resulting condition.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use weatherbox_domain::catalog::AnimationCatalog;

use crate::classifier::ConditionClassifier;
use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::ports::{LedStrip, WeatherSensor};

/// One session's worth of polling. Consumed by [`PollingLoop::run`].
pub struct PollingLoop<S, L> {
    sensor: Arc<S>,
    classifier: ConditionClassifier,
    catalog: Arc<AnimationCatalog>,
    dispatcher: Dispatcher<L>,
    interval: Duration,
}

impl<S, L> PollingLoop<S, L>
where
    S: WeatherSensor + 'static,
    L: LedStrip + 'static,
{
    pub fn new(
        sensor: Arc<S>,
        classifier: ConditionClassifier,
        catalog: Arc<AnimationCatalog>,
        dispatcher: Dispatcher<L>,
        interval: Duration,
    ) -> Self {
        Self {
            sensor,
            classifier,
            catalog,
            dispatcher,
            interval,
        }
    }

    /// Run one cycle immediately, then one per tick, until `token` is
    /// cancelled. The running animation is stopped before this returns.
    pub async fn run(mut self, token: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(interval_secs = self.interval.as_secs(), "weather polling started");

        loop {
            tokio::select! {
                biased;

                () = token.cancelled() => break,
                _ = ticker.tick() => {
                    self.cycle(&token).await;
                }
            }
        }

        if let Some(summary) = self.dispatcher.stop().await {
            tracing::debug!(
                issued = summary.commands_issued,
                failed = summary.commands_failed,
                "final animation stopped"
            );
        }
        tracing::info!("weather polling stopped");
    }

    /// Read, classify and dispatch once.
    ///
    /// Returns `None` when the cycle was skipped, either because the sensor
    /// failed or because `token` was cancelled during the read.
    pub async fn cycle(&mut self, token: &CancellationToken) -> Option<DispatchOutcome> {
        let result = tokio::select! {
            biased;

            () = token.cancelled() => return None,
            result = self.sensor.read() => result,
        };

        let reading = match result {
            Ok(reading) => reading,
            Err(err) => {
                tracing::warn!(%err, "error getting weather sensor readings");
                return None;
            }
        };

        let condition = self.classifier.classify(&reading, &self.catalog);
        tracing::debug!(%condition, fields = reading.len(), "weather classified");
        Some(self.dispatcher.dispatch(condition).await)
    }
}
