//! Condition classifier — turns a raw reading into a catalog key.
//!
//! Classification never fails: unusable readings fall back to
//! [`ConditionKey::NONE`], and keys the catalog has no program for fall
//! back to [`ConditionKey::ALL`].

use weatherbox_domain::catalog::AnimationCatalog;
use weatherbox_domain::condition::{ConditionKey, SkyState, Thresholds};
use weatherbox_domain::reading::{
    CONDITION_CODE_FIELD, FieldError, OUTSIDE_TEMPERATURE_FIELD, SensorReading,
};

/// Stateless mapping from [`SensorReading`] to [`ConditionKey`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConditionClassifier {
    thresholds: Thresholds,
}

impl ConditionClassifier {
    #[must_use]
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Classify `reading` into a key that `catalog` can resolve.
    #[must_use]
    pub fn classify(&self, reading: &SensorReading, catalog: &AnimationCatalog) -> ConditionKey {
        let condition = match self.derive(reading) {
            Ok(condition) => condition,
            Err(err) => {
                tracing::warn!(%err, "unusable weather reading, using fallback condition");
                ConditionKey::NONE
            }
        };

        if catalog.contains(&condition) {
            return condition;
        }
        tracing::debug!(%condition, "no animation for condition, using catch-all");
        ConditionKey::ALL
    }

    /// Derive the raw key from the reading, without any catalog fallback.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when `code` or `outside_f` is missing or not a
    /// finite number.
    pub fn derive(&self, reading: &SensorReading) -> Result<ConditionKey, FieldError> {
        let code = reading.number(CONDITION_CODE_FIELD)?;
        let outside_f = reading.number(OUTSIDE_TEMPERATURE_FIELD)?;
        if !outside_f.is_finite() {
            return Err(FieldError::NotANumber(OUTSIDE_TEMPERATURE_FIELD));
        }

        let sky = sky_from_code(code);
        let bucket = self.thresholds.bucket(outside_f);
        Ok(ConditionKey::from_parts(sky, bucket))
    }
}

/// Condition codes are integral; anything else is an unknown sky.
#[allow(clippy::cast_possible_truncation)]
fn sky_from_code(code: f64) -> SkyState {
    if !code.is_finite() || code.fract() != 0.0 {
        return SkyState::None;
    }
    SkyState::from_code(code as i64)
}
