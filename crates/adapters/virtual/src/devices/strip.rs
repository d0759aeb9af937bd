//! Virtual LED strip — logs and records the most recent commands it receives.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::Deserialize;

use weatherbox_app::ports::LedStrip;
use weatherbox_domain::error::WeatherboxError;

use crate::error::VirtualDeviceError;

/// Number of commands a strip remembers unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Declarative description of a virtual LED strip.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VirtualStripConfig {
    pub name: String,
    /// Start with the strip rejecting every command.
    pub offline: bool,
    /// Commands kept in the history; older ones are dropped first.
    pub history_limit: usize,
}

impl Default for VirtualStripConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            offline: false,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// A simulated LED strip.
pub struct VirtualLedStrip {
    name: String,
    history: Mutex<VecDeque<serde_json::Value>>,
    history_limit: usize,
    accepted: AtomicU64,
    offline: AtomicBool,
}

impl VirtualLedStrip {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            history: Mutex::new(VecDeque::new()),
            history_limit: DEFAULT_HISTORY_LIMIT,
            accepted: AtomicU64::new(0),
            offline: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn from_config(config: &VirtualStripConfig) -> Self {
        let strip = Self::new(config.name.clone()).with_history_limit(config.history_limit);
        strip.set_offline(config.offline);
        strip
    }

    /// Keep at most `limit` commands; a limit of zero records nothing.
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// The most recent accepted commands, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<serde_json::Value> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn last_command(&self) -> Option<serde_json::Value> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .back()
            .cloned()
    }

    /// Total commands accepted since creation, including those no longer in
    /// the history.
    #[must_use]
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::SeqCst)
    }
}

impl LedStrip for VirtualLedStrip {
    async fn execute(&self, command: &serde_json::Value) -> Result<(), WeatherboxError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(VirtualDeviceError::Offline {
                name: self.name.clone(),
            }
            .into());
        }

        tracing::info!(strip = %self.name, %command, "led command");
        self.accepted.fetch_add(1, Ordering::SeqCst);
        if self.history_limit == 0 {
            return Ok(());
        }
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        while history.len() >= self.history_limit {
            history.pop_front();
        }
        history.push_back(command.clone());
        Ok(())
    }
}
