//! Type-safe score scales for the health scoring system.
//!
//! Newtype wrappers encode the scale in the type system so percentiles and
//! health scores cannot be mixed with unclamped raw values.
//!
//! # Score Scales
//!
//! - `Score0To100`: standard 0-100 scale for health and composite scores
//! - `Percentile`: 0-100 percentile rank, with a fallible constructor for
//!   boundaries where NaN must be surfaced instead of clamped
//!
//! # Examples
//!
//! ```rust
//! use healthmap::core::score_types::Score0To100;
//!
//! // Out-of-bounds values are clamped
//! let clamped = Score0To100::new(150.0);
//! assert_eq!(clamped.value(), 100.0);
//! ```

use crate::errors::HealthError;
use serde::{Deserialize, Serialize};

/// Score on the 0-100 scale.
///
/// This is the standard scale for health scores throughout the system.
/// Dimension health scores, CSS/TRS/PGS components, and composite scores
/// all use this scale. Values are clamped to [0.0, 100.0]; NaN collapses
/// to 0.0 rather than propagating.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score0To100(f64);

impl Score0To100 {
    /// Create a new score, clamping to [0.0, 100.0].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use healthmap::core::score_types::Score0To100;
    /// let score = Score0To100::new(85.0);
    /// assert_eq!(score.value(), 85.0);
    ///
    /// let clamped = Score0To100::new(-3.0);
    /// assert_eq!(clamped.value(), 0.0);
    /// ```
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 100.0))
        }
    }

    /// Get the raw score value.
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Percentile rank on the 0-100 scale.
///
/// Distinct from [`Score0To100`] so maturity classification can only be fed
/// a value that already went through range policy: either the fallible
/// [`Percentile::try_new`] (caller error on NaN or out-of-range) or the
/// clamping [`Percentile::saturating`] for defensive interior boundaries.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentile(f64);

impl Percentile {
    /// Create a percentile, rejecting NaN and out-of-range input.
    ///
    /// Classification must never silently map bad input to a mid-band
    /// level, so boundary code uses this constructor and propagates the
    /// error upward.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use healthmap::core::score_types::Percentile;
    /// assert!(Percentile::try_new(62.0).is_ok());
    /// assert!(Percentile::try_new(f64::NAN).is_err());
    /// assert!(Percentile::try_new(101.0).is_err());
    /// ```
    pub fn try_new(value: f64) -> Result<Self, HealthError> {
        if value.is_nan() || !(0.0..=100.0).contains(&value) {
            Err(HealthError::InvalidPercentile(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Create a percentile by clamping into [0.0, 100.0].
    ///
    /// Used where an interior computation (penalty subtraction, trend
    /// adjustment) may legitimately push a value past the range edge.
    /// NaN collapses to 0.0.
    pub fn saturating(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 100.0))
        }
    }

    /// Get the raw percentile value.
    pub fn value(self) -> f64 {
        self.0
    }
}
