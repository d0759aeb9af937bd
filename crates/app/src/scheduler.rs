//! Weather scheduler — lifecycle controller for polling sessions.
//!
//! A session is one polling task bound to a child of the scheduler's root
//! token. Control operations (`start`, `stop`, `reconfigure`, `shutdown`)
//! are serialized by an async mutex and never return while a task they
//! cancelled is still alive.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use weatherbox_domain::catalog::AnimationCatalog;
use weatherbox_domain::condition::Thresholds;
use weatherbox_domain::config::ServiceConfig;
use weatherbox_domain::control::{ControlCommand, ControlStatus, SchedulerStatus};
use weatherbox_domain::error::WeatherboxError;

use crate::classifier::ConditionClassifier;
use crate::dispatcher::{Dispatcher, RestartPolicy};
use crate::polling::PollingLoop;
use crate::ports::{DeviceRegistry, LedStrip, WeatherSensor};

/// Drives an LED strip from a weather sensor, one session at a time.
pub struct WeatherScheduler<S, L> {
    catalog: Arc<AnimationCatalog>,
    classifier: ConditionClassifier,
    policy: RestartPolicy,
    root: CancellationToken,
    state: Mutex<State<S, L>>,
}

struct State<S, L> {
    config: ServiceConfig,
    sensor: Arc<S>,
    strip: Arc<L>,
    session: Option<Session>,
}

impl<S, L> State<S, L> {
    fn live_session(&self) -> Option<&Session> {
        self.session.as_ref().filter(|session| session.is_alive())
    }

    /// Detach a session whose task has already exited.
    fn take_dead_session(&mut self) -> Option<Session> {
        if self.session.as_ref().is_some_and(|session| !session.is_alive()) {
            self.session.take()
        } else {
            None
        }
    }
}

struct Session {
    token: CancellationToken,
    handle: JoinHandle<()>,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Whether the polling task is still alive. It only exits on its own
    /// when it panicked.
    fn is_alive(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Cancel the polling task and wait for it, and its player, to exit.
    async fn close(self) {
        self.token.cancel();
        if let Err(err) = self.handle.await {
            tracing::error!(%err, "weather polling task failed");
        }
    }
}

impl<S, L> WeatherScheduler<S, L>
where
    S: WeatherSensor + 'static,
    L: LedStrip + 'static,
{
    /// Build an idle scheduler.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherboxError::Validation`] if `config` is incomplete.
    pub fn new(
        config: ServiceConfig,
        sensor: Arc<S>,
        strip: Arc<L>,
        catalog: Arc<AnimationCatalog>,
    ) -> Result<Self, WeatherboxError> {
        config.validate()?;
        Ok(Self {
            catalog,
            classifier: ConditionClassifier::default(),
            policy: RestartPolicy::default(),
            root: CancellationToken::new(),
            state: Mutex::new(State {
                config,
                sensor,
                strip,
                session: None,
            }),
        })
    }

    /// Build an idle scheduler, resolving the configured devices by name.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherboxError::Validation`] if `config` is incomplete and
    /// [`WeatherboxError::NotFound`] naming the first device that could not
    /// be resolved.
    pub fn from_registry<R>(
        config: ServiceConfig,
        registry: &R,
        catalog: Arc<AnimationCatalog>,
    ) -> Result<Self, WeatherboxError>
    where
        R: DeviceRegistry<Sensor = S, Strip = L>,
    {
        let (sensor, strip) = resolve(&config, registry)?;
        Self::new(config, sensor, strip, catalog)
    }

    #[must_use]
    pub fn with_restart_policy(mut self, policy: RestartPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.classifier = ConditionClassifier::new(thresholds);
        self
    }

    /// Apply a control request from the wire.
    pub async fn execute(&self, command: ControlCommand) -> ControlStatus {
        match command {
            ControlCommand::Start => self.start().await,
            ControlCommand::Stop => self.stop().await,
        }
    }

    /// Launch a polling session unless one is already active.
    #[tracing::instrument(skip(self))]
    pub async fn start(&self) -> ControlStatus {
        let mut state = self.state.lock().await;

        if self.root.is_cancelled() {
            return ControlStatus::warning(ControlStatus::SHUT_DOWN);
        }
        if let Some(dead) = state.take_dead_session() {
            dead.close().await;
        }
        if state.session.is_some() {
            return ControlStatus::warning(ControlStatus::ALREADY_RUNNING);
        }

        let token = self.root.child_token();
        let dispatcher = Dispatcher::new(
            Arc::clone(&state.strip),
            Arc::clone(&self.catalog),
            self.policy,
            token.clone(),
        );
        let polling = PollingLoop::new(
            Arc::clone(&state.sensor),
            self.classifier,
            Arc::clone(&self.catalog),
            dispatcher,
            state.config.refresh_interval(),
        );
        let handle = tokio::spawn(polling.run(token.clone()));

        state.session = Some(Session {
            token,
            handle,
            started_at: Utc::now(),
        });
        tracing::info!(
            weather_sensor = %state.config.weather_sensor,
            led_component = %state.config.led_component,
            "weather service started"
        );
        ControlStatus::Started
    }

    /// Stop the active session and wait until its tasks have exited.
    #[tracing::instrument(skip(self))]
    pub async fn stop(&self) -> ControlStatus {
        let mut state = self.state.lock().await;
        if let Some(dead) = state.take_dead_session() {
            dead.close().await;
        }
        let Some(session) = state.session.take() else {
            return ControlStatus::warning(ControlStatus::NOT_RUNNING);
        };

        session.close().await;
        tracing::info!("weather service stopped");
        ControlStatus::Stopped
    }

    /// Replace configuration and device handles together.
    ///
    /// An active session is stopped first; the scheduler is left idle.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherboxError::Validation`] if `config` is incomplete, in
    /// which case nothing is changed.
    #[tracing::instrument(skip_all, fields(
        weather_sensor = %config.weather_sensor,
        led_component = %config.led_component,
    ))]
    pub async fn reconfigure(
        &self,
        config: ServiceConfig,
        sensor: Arc<S>,
        strip: Arc<L>,
    ) -> Result<(), WeatherboxError> {
        config.validate()?;

        let mut state = self.state.lock().await;
        if let Some(session) = state.session.take() {
            session.close().await;
            tracing::info!("weather service stopped for reconfiguration");
        }

        state.config = config;
        state.sensor = sensor;
        state.strip = strip;
        tracing::info!("weather service reconfigured");
        Ok(())
    }

    /// Like [`reconfigure`](Self::reconfigure), resolving devices by name.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherboxError::Validation`] or
    /// [`WeatherboxError::NotFound`]; in both cases nothing is changed.
    pub async fn reconfigure_from<R>(
        &self,
        config: ServiceConfig,
        registry: &R,
    ) -> Result<(), WeatherboxError>
    where
        R: DeviceRegistry<Sensor = S, Strip = L>,
    {
        let (sensor, strip) = resolve(&config, registry)?;
        self.reconfigure(config, sensor, strip).await
    }

    /// Cancel everything and wait for teardown. Safe to call repeatedly.
    pub async fn shutdown(&self) {
        self.root.cancel();
        let mut state = self.state.lock().await;
        if let Some(session) = state.session.take() {
            session.close().await;
            tracing::info!("weather service shut down");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.state.lock().await.live_session().is_some()
    }

    pub async fn status(&self) -> SchedulerStatus {
        let state = self.state.lock().await;
        SchedulerStatus {
            running: state.live_session().is_some(),
            started_at: state.live_session().map(|session| session.started_at),
            shut_down: self.root.is_cancelled(),
            config: state.config.clone(),
        }
    }
}

impl<S, L> Drop for WeatherScheduler<S, L> {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

fn resolve<R: DeviceRegistry>(
    config: &ServiceConfig,
    registry: &R,
) -> Result<(Arc<R::Sensor>, Arc<R::Strip>), WeatherboxError> {
    config.validate()?;
    let sensor = registry.weather_sensor(&config.weather_sensor)?;
    let strip = registry.led_strip(&config.led_component)?;
    Ok((sensor, strip))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use weatherbox_domain::catalog::PULSE_PERIOD;
    use weatherbox_domain::error::{NotFoundError, ValidationError};
    use weatherbox_domain::reading::SensorReading;

    use crate::test_support::{RecordingStrip, ScriptedSensor, reading};

    type TestScheduler = WeatherScheduler<ScriptedSensor, RecordingStrip>;

    fn config(sensor: &str, strip: &str) -> ServiceConfig {
        ServiceConfig::new(60, sensor, strip)
    }

    fn scheduler(sensor: &Arc<ScriptedSensor>, strip: &Arc<RecordingStrip>) -> TestScheduler {
        WeatherScheduler::new(
            config("weather", "led"),
            Arc::clone(sensor),
            Arc::clone(strip),
            Arc::new(AnimationCatalog::weather()),
        )
        .unwrap()
    }

    fn sunny_hot() -> Arc<ScriptedSensor> {
        Arc::new(ScriptedSensor::always(reading(1000, 70.0)))
    }

    /// A sensor whose driver panics on every read.
    struct CrashingSensor;

    impl WeatherSensor for CrashingSensor {
        async fn read(&self) -> Result<SensorReading, WeatherboxError> {
            panic!("sensor driver crashed")
        }
    }

    #[derive(Default)]
    struct MapRegistry {
        sensors: HashMap<String, Arc<ScriptedSensor>>,
        strips: HashMap<String, Arc<RecordingStrip>>,
    }

    impl DeviceRegistry for MapRegistry {
        type Sensor = ScriptedSensor;
        type Strip = RecordingStrip;

        fn weather_sensor(&self, name: &str) -> Result<Arc<ScriptedSensor>, NotFoundError> {
            self.sensors.get(name).cloned().ok_or_else(|| NotFoundError {
                kind: "weather sensor",
                name: name.to_string(),
            })
        }

        fn led_strip(&self, name: &str) -> Result<Arc<RecordingStrip>, NotFoundError> {
            self.strips.get(name).cloned().ok_or_else(|| NotFoundError {
                kind: "led component",
                name: name.to_string(),
            })
        }
    }

    #[test]
    fn should_reject_incomplete_config_at_construction() {
        let result = TestScheduler::new(
            ServiceConfig::new(0, "weather", "led"),
            sunny_hot(),
            Arc::new(RecordingStrip::default()),
            Arc::new(AnimationCatalog::weather()),
        );
        assert!(matches!(
            result,
            Err(WeatherboxError::Validation(
                ValidationError::MissingRefreshInterval
            ))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn should_warn_when_started_twice() {
        let sensor = sunny_hot();
        let strip = Arc::new(RecordingStrip::default());
        let scheduler = scheduler(&sensor, &strip);

        assert_eq!(scheduler.start().await, ControlStatus::Started);
        assert_eq!(
            scheduler.start().await,
            ControlStatus::warning(ControlStatus::ALREADY_RUNNING)
        );
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(sensor.reads(), 1);
        assert!(scheduler.is_running().await);
        scheduler.shutdown().await;
    }

    #[tokio::test]
    async fn should_warn_when_stopping_idle_service() {
        let sensor = sunny_hot();
        let strip = Arc::new(RecordingStrip::default());
        let scheduler = scheduler(&sensor, &strip);

        let status = scheduler.stop().await;

        assert_eq!(status, ControlStatus::warning(ControlStatus::NOT_RUNNING));
        assert!(!scheduler.status().await.running);
        assert_eq!(sensor.reads(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn should_send_nothing_after_stop_returns() {
        let sensor = sunny_hot();
        let strip = Arc::new(RecordingStrip::default());
        let scheduler = scheduler(&sensor, &strip);
        scheduler.start().await;
        tokio::time::sleep(Duration::from_secs(7)).await;

        assert_eq!(scheduler.stop().await, ControlStatus::Stopped);
        let after_stop = strip.count();
        tokio::time::sleep(Duration::from_secs(300)).await;

        assert_eq!(strip.count(), after_stop);
        assert!(!scheduler.is_running().await);
    }

    #[tokio::test(start_paused = true)]
    async fn should_loop_sunny_hot_program_in_catalog_order() {
        let sensor = sunny_hot();
        let strip = Arc::new(RecordingStrip::default());
        let scheduler = scheduler(&sensor, &strip);
        let expected: Vec<_> = AnimationCatalog::weather()
            .lookup(&weatherbox_domain::condition::ConditionKey::SUNNY_HOT)
            .unwrap()
            .steps()
            .iter()
            .map(|step| step.command().clone())
            .collect();

        scheduler.start().await;
        tokio::time::sleep(PULSE_PERIOD * 5 + Duration::from_millis(500)).await;
        scheduler.stop().await;

        let commands = strip.commands();
        assert_eq!(commands.len(), 6);
        assert_eq!(commands[..3], expected[..]);
        assert_eq!(commands[3..], expected[..]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_skip_actuator_when_sensor_fails() {
        let sensor = Arc::new(ScriptedSensor::always(reading(1000, 70.0)).then(Err("timeout")));
        let strip = Arc::new(RecordingStrip::default());
        let scheduler = scheduler(&sensor, &strip);

        scheduler.start().await;
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(strip.count(), 0);

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(sensor.reads(), 2);
        assert!(strip.count() > 0);
        scheduler.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_use_only_new_devices_after_reconfigure() {
        let sensor_a = sunny_hot();
        let strip_a = Arc::new(RecordingStrip::default());
        let sensor_b = Arc::new(ScriptedSensor::always(reading(1009, 20.0)));
        let strip_b = Arc::new(RecordingStrip::default());
        let scheduler = scheduler(&sensor_a, &strip_a);
        scheduler.start().await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        scheduler
            .reconfigure(
                ServiceConfig::new(30, "weather-b", "led-b"),
                Arc::clone(&sensor_b),
                Arc::clone(&strip_b),
            )
            .await
            .unwrap();
        assert!(!scheduler.is_running().await);
        let (reads_a, commands_a) = (sensor_a.reads(), strip_a.count());

        scheduler.start().await;
        tokio::time::sleep(Duration::from_secs(65)).await;
        scheduler.stop().await;

        assert_eq!(sensor_a.reads(), reads_a);
        assert_eq!(strip_a.count(), commands_a);
        assert_eq!(sensor_b.reads(), 3);
        assert!(strip_b.count() > 0);
        assert_eq!(scheduler.status().await.config.refresh_interval_secs, 30);
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_session_when_reconfigure_is_invalid() {
        let sensor = sunny_hot();
        let strip = Arc::new(RecordingStrip::default());
        let scheduler = scheduler(&sensor, &strip);
        scheduler.start().await;

        let result = scheduler
            .reconfigure(
                ServiceConfig::new(60, "", "led"),
                sunny_hot(),
                Arc::new(RecordingStrip::default()),
            )
            .await;

        assert!(matches!(
            result,
            Err(WeatherboxError::Validation(
                ValidationError::MissingWeatherSensor
            ))
        ));
        let status = scheduler.status().await;
        assert!(status.running);
        assert_eq!(status.config.weather_sensor, "weather");
        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_refuse_start_after_shutdown() {
        let sensor = sunny_hot();
        let strip = Arc::new(RecordingStrip::default());
        let scheduler = scheduler(&sensor, &strip);
        scheduler.start().await;

        scheduler.shutdown().await;
        scheduler.shutdown().await;

        let status = scheduler.status().await;
        assert!(status.shut_down);
        assert!(!status.running);
        assert_eq!(
            scheduler.start().await,
            ControlStatus::warning(ControlStatus::SHUT_DOWN)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_send_nothing_after_shutdown_returns() {
        let sensor = sunny_hot();
        let strip = Arc::new(RecordingStrip::default());
        let scheduler = scheduler(&sensor, &strip);
        scheduler.start().await;
        tokio::time::sleep(Duration::from_secs(7)).await;
        assert!(strip.count() > 0);

        scheduler.shutdown().await;
        let (reads, commands) = (sensor.reads(), strip.count());
        tokio::time::sleep(PULSE_PERIOD * 20).await;
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert_eq!(strip.count(), commands);
        assert_eq!(sensor.reads(), reads);
    }

    #[tokio::test(start_paused = true)]
    async fn should_stop_session_when_dropped() {
        let sensor = sunny_hot();
        let strip = Arc::new(RecordingStrip::default());
        let scheduler = scheduler(&sensor, &strip);
        scheduler.start().await;
        tokio::time::sleep(Duration::from_secs(7)).await;

        let (reads, commands) = (sensor.reads(), strip.count());
        drop(scheduler);
        tokio::time::sleep(PULSE_PERIOD * 20).await;
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert_eq!(strip.count(), commands);
        assert_eq!(sensor.reads(), reads);
    }

    #[tokio::test(start_paused = true)]
    async fn should_allow_restart_after_polling_task_panics() {
        let strip = Arc::new(RecordingStrip::default());
        let scheduler = WeatherScheduler::new(
            config("weather", "led"),
            Arc::new(CrashingSensor),
            Arc::clone(&strip),
            Arc::new(AnimationCatalog::weather()),
        )
        .unwrap();

        assert_eq!(scheduler.start().await, ControlStatus::Started);
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(!scheduler.is_running().await);
        let status = scheduler.status().await;
        assert!(!status.running);
        assert!(status.started_at.is_none());
        assert_eq!(
            scheduler.stop().await,
            ControlStatus::warning(ControlStatus::NOT_RUNNING)
        );
        assert_eq!(scheduler.start().await, ControlStatus::Started);
        assert_eq!(strip.count(), 0);
        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_dispatch_wire_commands() {
        let sensor = sunny_hot();
        let strip = Arc::new(RecordingStrip::default());
        let scheduler = scheduler(&sensor, &strip);

        assert_eq!(
            scheduler.execute(ControlCommand::Start).await,
            ControlStatus::Started
        );
        assert!(scheduler.status().await.started_at.is_some());
        assert_eq!(
            scheduler.execute(ControlCommand::Stop).await,
            ControlStatus::Stopped
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_resolve_devices_from_registry() {
        let sensor = sunny_hot();
        let strip = Arc::new(RecordingStrip::default());
        let mut registry = MapRegistry::default();
        registry.sensors.insert("weather".into(), Arc::clone(&sensor));
        registry.strips.insert("led".into(), Arc::clone(&strip));

        let scheduler = WeatherScheduler::from_registry(
            config("weather", "led"),
            &registry,
            Arc::new(AnimationCatalog::weather()),
        )
        .unwrap();
        scheduler.start().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        scheduler.stop().await;

        assert_eq!(sensor.reads(), 1);
        assert_eq!(strip.count(), 1);
    }

    #[test]
    fn should_name_missing_device_when_resolution_fails() {
        let registry = MapRegistry::default();

        let result = TestScheduler::from_registry(
            config("attic", "led"),
            &registry,
            Arc::new(AnimationCatalog::weather()),
        );

        let Err(WeatherboxError::NotFound(err)) = result else {
            panic!("expected a not found error");
        };
        assert_eq!(err.name, "attic");
        assert!(err.to_string().contains("attic"));
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_old_devices_when_reconfigure_cannot_resolve() {
        let sensor = sunny_hot();
        let strip = Arc::new(RecordingStrip::default());
        let scheduler = scheduler(&sensor, &strip);
        scheduler.start().await;
        let mut registry = MapRegistry::default();
        registry.sensors.insert("weather-b".into(), sunny_hot());

        let result = scheduler
            .reconfigure_from(config("weather-b", "led-b"), &registry)
            .await;

        let Err(WeatherboxError::NotFound(err)) = result else {
            panic!("expected a not found error");
        };
        assert_eq!(err.name, "led-b");
        assert!(scheduler.is_running().await);
        scheduler.shutdown().await;
    }
}
