//! Raw sensor readings — a bag of named numeric or string fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field carrying the numeric weather condition code.
pub const CONDITION_CODE_FIELD: &str = "code";

/// Field carrying the outdoor temperature in degrees Fahrenheit.
pub const OUTSIDE_TEMPERATURE_FIELD: &str = "outside_f";

/// A single field value reported by a sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingValue {
    Number(f64),
    Text(String),
}

impl ReadingValue {
    /// The numeric value, if this field is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

impl From<f64> for ReadingValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for ReadingValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for ReadingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ReadingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One snapshot produced by a weather sensor.
///
/// Consumed once per poll and never mutated by the core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorReading {
    fields: BTreeMap<String, ReadingValue>,
}

impl SensorReading {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any previous value under the same name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ReadingValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ReadingValue> {
        self.fields.get(name)
    }

    /// Look up a field and require it to be numeric.
    ///
    /// Distinguishes a missing field from a wrong-typed one so callers can
    /// log precisely.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when the field is absent or not a number.
    pub fn number(&self, name: &'static str) -> Result<f64, FieldError> {
        match self.fields.get(name) {
            None => Err(FieldError::Missing(name)),
            Some(value) => value.as_number().ok_or(FieldError::NotANumber(name)),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<ReadingValue>> FromIterator<(K, V)> for SensorReading {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Why a required reading field could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("no {0:?} field in reading")]
    Missing(&'static str),
    #[error("{0:?} field in reading is not a number")]
    NotANumber(&'static str),
}
