//! Hand-written port fakes shared by the unit tests of this crate.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::json;
use tokio::time::Instant;

use weatherbox_domain::animation::AnimationStep;
use weatherbox_domain::error::WeatherboxError;
use weatherbox_domain::reading::SensorReading;

use crate::ports::{LedStrip, WeatherSensor};

// ── Sensor ─────────────────────────────────────────────────────────

/// Returns queued results first, then repeats `fallback` forever.
pub struct ScriptedSensor {
    queued: Mutex<VecDeque<Result<SensorReading, String>>>,
    fallback: SensorReading,
    reads: AtomicUsize,
}

impl ScriptedSensor {
    pub fn always(reading: SensorReading) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            fallback: reading,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn then(self, result: Result<SensorReading, &str>) -> Self {
        self.queued
            .lock()
            .unwrap()
            .push_back(result.map_err(str::to_string));
        self
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl WeatherSensor for ScriptedSensor {
    async fn read(&self) -> Result<SensorReading, WeatherboxError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let next = self.queued.lock().unwrap().pop_front();
        match next {
            Some(Ok(reading)) => Ok(reading),
            Some(Err(message)) => Err(WeatherboxError::device(std::io::Error::other(message))),
            None => Ok(self.fallback.clone()),
        }
    }
}

pub fn reading(code: i32, outside_f: f64) -> SensorReading {
    SensorReading::new()
        .with("code", code)
        .with("outside_f", outside_f)
}

// ── LED strip ──────────────────────────────────────────────────────

/// Records every command with the (tokio) instant it arrived.
#[derive(Default)]
pub struct RecordingStrip {
    received: Mutex<Vec<(Instant, serde_json::Value)>>,
    fail_first: AtomicUsize,
}

impl RecordingStrip {
    /// Fail the first `count` commands, then succeed.
    pub fn failing_first(count: usize) -> Self {
        Self {
            received: Mutex::new(Vec::new()),
            fail_first: AtomicUsize::new(count),
        }
    }

    pub fn commands(&self) -> Vec<serde_json::Value> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .map(|(_, cmd)| cmd.clone())
            .collect()
    }

    pub fn timeline(&self) -> Vec<(Instant, serde_json::Value)> {
        self.received.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

impl LedStrip for RecordingStrip {
    async fn execute(&self, command: &serde_json::Value) -> Result<(), WeatherboxError> {
        self.received
            .lock()
            .unwrap()
            .push((Instant::now(), command.clone()));
        let failed = self
            .fail_first
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(WeatherboxError::device(std::io::Error::other(
                "strip rejected command",
            )));
        }
        Ok(())
    }
}

/// One command handled by a [`SlowStrip`].
#[derive(Debug, Clone)]
pub struct Call {
    pub command: serde_json::Value,
    pub entered: Instant,
    pub exited: Instant,
}

/// Takes `latency` to apply each command and records when it did.
pub struct SlowStrip {
    latency: Duration,
    calls: Mutex<Vec<Call>>,
}

impl SlowStrip {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl LedStrip for SlowStrip {
    async fn execute(&self, command: &serde_json::Value) -> Result<(), WeatherboxError> {
        let entered = Instant::now();
        tokio::time::sleep(self.latency).await;
        self.calls.lock().unwrap().push(Call {
            command: command.clone(),
            entered,
            exited: Instant::now(),
        });
        Ok(())
    }
}

// ── Programs ───────────────────────────────────────────────────────

/// Steps tagged `{"program": tag, "step": i}` lasting `millis[i]`.
pub fn tagged_steps(tag: &str, millis: &[u64]) -> Vec<AnimationStep> {
    millis
        .iter()
        .enumerate()
        .map(|(i, ms)| {
            AnimationStep::new(
                json!({"program": tag, "step": i}),
                Duration::from_millis(*ms),
            )
        })
        .collect()
}
