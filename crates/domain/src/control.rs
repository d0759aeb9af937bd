//! Control surface vocabulary — `start` / `stop` requests and the status
//! records returned for them.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::config::ServiceConfig;

/// A control request, as sent on the wire: `{"state": "start"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ControlCommand {
    Start,
    Stop,
}

/// Outcome of a control request.
///
/// Misuse (stopping an idle service, starting a running one) is reported as
/// a [`ControlStatus::Warning`] in the same shape as success, never as an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlStatus {
    Started,
    Stopped,
    Warning(String),
}

impl ControlStatus {
    pub const ALREADY_RUNNING: &'static str = "already running";
    pub const NOT_RUNNING: &'static str = "no currently running service to stop";
    pub const SHUT_DOWN: &'static str = "service has been shut down";

    #[must_use]
    pub fn warning(reason: impl Into<String>) -> Self {
        Self::Warning(reason.into())
    }
}

impl Serialize for ControlStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Started => map.serialize_entry("started", &true)?,
            Self::Stopped => map.serialize_entry("stopped", &true)?,
            Self::Warning(reason) => map.serialize_entry("warning", reason)?,
        }
        map.end()
    }
}

/// Snapshot of the scheduler for observability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerStatus {
    pub running: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub shut_down: bool,
    pub config: ServiceConfig,
}
