//! Extraction confidence scores
//!
//! Every extracted claim field carries a confidence in `[0, 1]`. Scores
//! strictly below [`LOW_CONFIDENCE_THRESHOLD`] are treated as unreliable
//! across the whole system; a score of exactly `0.3` is *not* low.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// System-wide threshold below which an extracted value is unreliable
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.3;

/// A confidence score clamped to `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Full confidence, used for values entered directly by the claimant
    pub const CERTAIN: Confidence = Confidence(1.0);

    /// Creates a confidence, clamping into `[0, 1]`; NaN becomes zero
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Creates a confidence, rejecting values outside `[0, 1]`
    pub fn try_new(value: f64) -> Result<Self, CoreError> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(CoreError::validation(format!(
                "confidence must be within [0, 1], got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Returns the raw score
    pub fn value(&self) -> f64 {
        self.0
    }

    /// True when the score is strictly below the low-confidence threshold
    pub fn is_low(&self) -> bool {
        self.0 < LOW_CONFIDENCE_THRESHOLD
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::CERTAIN
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(confidence: Confidence) -> f64 {
        confidence.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
