//! Animation catalog — static mapping from condition key to program.
//!
//! Built once at startup and shared read-only (behind an `Arc`) by every
//! playback; nothing mutates it afterwards.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::animation::{AnimationProgram, AnimationStep, Color};
use crate::condition::ConditionKey;
use crate::error::ValidationError;

/// Named colors used by the default catalog.
pub mod palette {
    use super::Color;

    pub const ORANGE: Color = Color::rgb(255, 70, 0);
    pub const RED: Color = Color::rgb(255, 0, 120);
    pub const MAGENTA: Color = Color::rgb(255, 0, 5);
    pub const PURPLE: Color = Color::rgb(150, 0, 255);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const GREEN: Color = Color::rgb(50, 250, 10);
    pub const CYAN: Color = Color::rgb(69, 255, 226);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
}

/// How long each pulse step of the default catalog lasts.
pub const PULSE_PERIOD: Duration = Duration::from_secs(3);

/// Pulse speed passed to the LED strip by the default catalog.
pub const PULSE_SPEED: f64 = 0.001;

/// Read-only table of animation programs keyed by condition.
#[derive(Debug, Clone, Default)]
pub struct AnimationCatalog {
    programs: HashMap<ConditionKey, Arc<AnimationProgram>>,
}

impl AnimationCatalog {
    /// Create an empty catalog builder.
    #[must_use]
    pub fn builder() -> AnimationCatalogBuilder {
        AnimationCatalogBuilder::default()
    }

    /// The built-in weather catalog.
    ///
    /// Every key the classifier can derive from a well-formed reading, plus
    /// the `none` and `all` fallbacks, has an entry.
    #[must_use]
    pub fn weather() -> Self {
        use palette::{BLUE, CYAN, GREEN, MAGENTA, ORANGE, PURPLE, RED, WHITE};

        let entries = [
            (ConditionKey::SUNNY_HOT, [ORANGE, RED, MAGENTA]),
            (ConditionKey::SUNNY_COLD, [ORANGE, PURPLE, BLUE]),
            (ConditionKey::CLOUDY_HOT, [WHITE, MAGENTA, RED]),
            (ConditionKey::CLOUDY_COLD, [WHITE, PURPLE, BLUE]),
            (ConditionKey::RAINY_HOT, [CYAN, MAGENTA, RED]),
            (ConditionKey::NONE, [GREEN, MAGENTA, RED]),
            (ConditionKey::ALL, [MAGENTA, PURPLE, ORANGE]),
        ];

        let programs = entries
            .into_iter()
            .map(|(key, colors)| (key, Arc::new(pulse_program(&colors))))
            .collect();
        Self { programs }
    }

    /// Look up the program for `key`. `None` is an expected outcome.
    #[must_use]
    pub fn lookup(&self, key: &ConditionKey) -> Option<Arc<AnimationProgram>> {
        self.programs.get(key).cloned()
    }

    #[must_use]
    pub fn contains(&self, key: &ConditionKey) -> bool {
        self.programs.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

/// One pulse step per color, in order.
fn pulse_program(colors: &[Color]) -> AnimationProgram {
    let steps = colors
        .iter()
        .map(|color| AnimationStep::pulse(std::slice::from_ref(color), PULSE_PERIOD, PULSE_SPEED))
        .collect();
    // Non-empty and non-zero by construction.
    AnimationProgram::new(steps).unwrap_or_else(|err| unreachable!("{err}"))
}

/// Step-by-step builder for [`AnimationCatalog`].
#[derive(Debug, Default)]
pub struct AnimationCatalogBuilder {
    programs: HashMap<ConditionKey, Arc<AnimationProgram>>,
}

impl AnimationCatalogBuilder {
    #[must_use]
    pub fn program(mut self, key: ConditionKey, program: AnimationProgram) -> Self {
        self.programs.insert(key, Arc::new(program));
        self
    }

    /// Add a program built from raw steps.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the steps do not form a valid program.
    pub fn steps(
        self,
        key: ConditionKey,
        steps: Vec<AnimationStep>,
    ) -> Result<Self, ValidationError> {
        Ok(self.program(key, AnimationProgram::new(steps)?))
    }

    #[must_use]
    pub fn build(self) -> AnimationCatalog {
        AnimationCatalog {
            programs: self.programs,
        }
    }
}
