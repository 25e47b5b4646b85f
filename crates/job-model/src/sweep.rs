//! Sweep configuration: the numeric ranges and tint a job renders across.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Smallest number of variants a job may request.
pub const MIN_VARIANTS: usize = 1;

/// Largest number of variants a job may request.
pub const MAX_VARIANTS: usize = 36;

/// Color treatment applied to the extracted highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tint {
    #[default]
    Neutral,
    Warm,
    Cool,
}

impl Tint {
    pub fn as_str(self) -> &'static str {
        match self {
            Tint::Neutral => "neutral",
            Tint::Warm => "warm",
            Tint::Cool => "cool",
        }
    }

    /// Parse a tint name, treating anything unrecognized as neutral.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for Tint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tint {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "neutral" => Ok(Tint::Neutral),
            "warm" => Ok(Tint::Warm),
            "cool" => Ok(Tint::Cool),
            other => Err(ValidationError::UnknownTint {
                value: other.to_string(),
            }),
        }
    }
}

/// Inclusive numeric range swept from `min` to `max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange<T> {
    pub min: T,
    pub max: T,
}

impl<T> ValueRange<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

/// Everything that determines a job's variants. Immutable once a job exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Number of variants to render.
    pub count: usize,

    /// Luma threshold below which pixels are dropped from the highlight layer.
    pub threshold: ValueRange<i64>,

    /// Blur radius applied to the highlight layer.
    pub sigma: ValueRange<i64>,

    /// Screen-blend opacity of the highlight layer.
    pub opacity: ValueRange<f64>,

    pub tint: Tint,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            count: 12,
            threshold: ValueRange::new(225, 240),
            sigma: ValueRange::new(6, 14),
            opacity: ValueRange::new(0.18, 0.30),
            tint: Tint::Neutral,
        }
    }
}

impl SweepConfig {
    /// Apply submission-boundary policy: `count` is clamped into
    /// `[MIN_VARIANTS, MAX_VARIANTS]`.
    pub fn normalized(mut self) -> Self {
        self.count = self.count.clamp(MIN_VARIANTS, MAX_VARIANTS);
        self
    }

    /// Reject configurations that cannot be swept.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_VARIANTS..=MAX_VARIANTS).contains(&self.count) {
            return Err(ValidationError::CountOutOfRange { count: self.count });
        }
        for (field, value) in [
            ("opacity.min", self.opacity.min),
            ("opacity.max", self.opacity.max),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite { field });
            }
        }
        Ok(())
    }
}

/// Submission-time validation failures. No job is created when one occurs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("variant count {count} outside 1..=36")]
    CountOutOfRange { count: usize },

    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("unknown tint '{value}' (expected neutral, warm or cool)")]
    UnknownTint { value: String },
}
