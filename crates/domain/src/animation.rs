//! Animation programs — ordered, timed actuator commands.
//!
//! A program is played in a loop: each [`AnimationStep`] hands its command
//! to the LED strip and then holds for the step's duration. The command is
//! an opaque JSON document; only the LED strip interprets it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ValidationError;

/// An RGB color, serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for [u8; 3] {
    fn from(color: Color) -> Self {
        [color.r, color.g, color.b]
    }
}

/// One timed command of an animation program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationStep {
    command: serde_json::Value,
    duration: Duration,
}

impl AnimationStep {
    #[must_use]
    pub fn new(command: serde_json::Value, duration: Duration) -> Self {
        Self { command, duration }
    }

    /// A `pulse` command cycling through `colors` once every `period`.
    #[must_use]
    pub fn pulse(colors: &[Color], period: Duration, speed: f64) -> Self {
        let command = json!({
            "set_animation": "pulse",
            "speed": speed,
            "period": period.as_secs_f64(),
            "colors": colors,
        });
        Self::new(command, period)
    }

    #[must_use]
    pub fn command(&self) -> &serde_json::Value {
        &self.command
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Ordered, non-empty list of steps, looped indefinitely during playback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationProgram {
    steps: Vec<AnimationStep>,
}

impl AnimationProgram {
    /// Build a program from its steps.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyProgram`] when `steps` is empty and
    /// [`ValidationError::ZeroLengthProgram`] when every step lasts zero
    /// time.
    pub fn new(steps: Vec<AnimationStep>) -> Result<Self, ValidationError> {
        if steps.is_empty() {
            return Err(ValidationError::EmptyProgram);
        }
        if steps.iter().all(|step| step.duration.is_zero()) {
            return Err(ValidationError::ZeroLengthProgram);
        }
        Ok(Self { steps })
    }

    #[must_use]
    pub fn steps(&self) -> &[AnimationStep] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Length of one pass through the program.
    #[must_use]
    pub fn cycle_duration(&self) -> Duration {
        self.steps.iter().map(AnimationStep::duration).sum()
    }
}

impl<'de> Deserialize<'de> for AnimationProgram {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            steps: Vec<AnimationStep>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.steps).map_err(serde::de::Error::custom)
    }
}
