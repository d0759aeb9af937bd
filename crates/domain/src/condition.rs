//! Condition keys — the discrete labels derived from weather readings.
//!
//! A key is a sky state plus a temperature bucket (`"sunny/hot"`), the
//! bare `"none"` key for unrecognized skies or unusable readings, or the
//! catch-all `"all"`.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Coarse sky state derived from a numeric condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkyState {
    Sunny,
    Cloudy,
    Rainy,
    None,
}

impl SkyState {
    /// Map a weather condition code to a sky state.
    ///
    /// Unrecognized codes map to [`SkyState::None`].
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            1000 | 1003 => Self::Sunny,
            1006 | 1009 | 1030 | 1135 | 1147 => Self::Cloudy,
            1063 | 1066 | 1069 | 1072 | 1087 | 1153 | 1168 | 1171 | 1180 | 1183 | 1186 | 1189
            | 1192 | 1195 | 1198 | 1201 | 1204 | 1207 | 1240 | 1243 | 1246 | 1249 | 1252
            | 1273 | 1276 | 1279 | 1282 | 1550 => Self::Rainy,
            _ => Self::None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::None => "none",
        }
    }
}

impl fmt::Display for SkyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outdoor temperature bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureBucket {
    Hot,
    Moderate,
    Cold,
}

impl TemperatureBucket {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Moderate => "moderate",
            Self::Cold => "cold",
        }
    }
}

impl fmt::Display for TemperatureBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed temperature thresholds, in degrees Fahrenheit.
///
/// `hot` and `cold` are inclusive: a reading equal to `hot` is hot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub hot: f64,
    pub cold: f64,
}

impl Thresholds {
    pub const DEFAULT_HOT_F: f64 = 65.0;
    pub const DEFAULT_COLD_F: f64 = 33.0;

    #[must_use]
    pub fn bucket(&self, outside_f: f64) -> TemperatureBucket {
        if outside_f >= self.hot {
            TemperatureBucket::Hot
        } else if outside_f <= self.cold {
            TemperatureBucket::Cold
        } else {
            TemperatureBucket::Moderate
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            hot: Self::DEFAULT_HOT_F,
            cold: Self::DEFAULT_COLD_F,
        }
    }
}

/// Discrete classification label used to look up an animation program.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConditionKey(Cow<'static, str>);

impl ConditionKey {
    /// Fallback for readings that cannot be classified.
    pub const NONE: Self = Self(Cow::Borrowed("none"));
    /// Catch-all for derived keys the catalog does not know.
    pub const ALL: Self = Self(Cow::Borrowed("all"));

    pub const SUNNY_HOT: Self = Self(Cow::Borrowed("sunny/hot"));
    pub const SUNNY_COLD: Self = Self(Cow::Borrowed("sunny/cold"));
    pub const CLOUDY_HOT: Self = Self(Cow::Borrowed("cloudy/hot"));
    pub const CLOUDY_COLD: Self = Self(Cow::Borrowed("cloudy/cold"));
    pub const RAINY_HOT: Self = Self(Cow::Borrowed("rainy/hot"));

    /// Build a key from a free-form label, normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyConditionKey`] for blank input.
    pub fn new(label: impl AsRef<str>) -> Result<Self, ValidationError> {
        let label = label.as_ref().trim();
        if label.is_empty() {
            return Err(ValidationError::EmptyConditionKey);
        }
        Ok(Self(Cow::Owned(label.to_lowercase())))
    }

    /// Combine a sky state and a temperature bucket.
    ///
    /// An unrecognized sky collapses to [`ConditionKey::NONE`] whatever the
    /// temperature.
    #[must_use]
    pub fn from_parts(sky: SkyState, bucket: TemperatureBucket) -> Self {
        if sky == SkyState::None {
            return Self::NONE;
        }
        Self(Cow::Owned(format!("{sky}/{bucket}")))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ConditionKey {
    type Error = ValidationError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        Self::new(label)
    }
}

impl From<ConditionKey> for String {
    fn from(key: ConditionKey) -> Self {
        key.0.into_owned()
    }
}

impl fmt::Display for ConditionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
