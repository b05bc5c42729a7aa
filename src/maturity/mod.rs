//! Maturity classification: percentile → one of five fixed bands.
//!
//! The bands are fixed and non-overlapping; classification is a pure
//! function and monotonically non-decreasing in the percentile. Band
//! boundaries are inclusive on the left, exclusive on the right, except
//! the top band which closes at 100.
//!
//! | Band | Range     | Level | Name            |
//! |------|-----------|-------|-----------------|
//! | 1    | [0, 30)   | 1     | Needs Attention |
//! | 2    | [30, 45)  | 2     | Below Average   |
//! | 3    | [45, 55)  | 3     | Average         |
//! | 4    | [55, 70)  | 4     | Good            |
//! | 5    | [70, 100] | 5     | Excellent       |

use crate::core::Percentile;
use crate::errors::HealthError;
use serde::{Deserialize, Serialize};

/// One of the five maturity bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaturityLevel {
    NeedsAttention,
    BelowAverage,
    Average,
    Good,
    Excellent,
}

/// Static metadata for one maturity band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaturityLevelConfig {
    pub level: u8,
    pub name: &'static str,
    /// Inclusive lower percentile bound.
    pub min_percentile: f64,
    /// Exclusive upper bound, except 100.0 which is inclusive.
    pub max_percentile: f64,
}

const BANDS: [MaturityLevelConfig; 5] = [
    MaturityLevelConfig {
        level: 1,
        name: "Needs Attention",
        min_percentile: 0.0,
        max_percentile: 30.0,
    },
    MaturityLevelConfig {
        level: 2,
        name: "Below Average",
        min_percentile: 30.0,
        max_percentile: 45.0,
    },
    MaturityLevelConfig {
        level: 3,
        name: "Average",
        min_percentile: 45.0,
        max_percentile: 55.0,
    },
    MaturityLevelConfig {
        level: 4,
        name: "Good",
        min_percentile: 55.0,
        max_percentile: 70.0,
    },
    MaturityLevelConfig {
        level: 5,
        name: "Excellent",
        min_percentile: 70.0,
        max_percentile: 100.0,
    },
];

impl MaturityLevel {
    /// Numeric level, 1 (worst) through 5 (best).
    pub fn level(self) -> u8 {
        self.config().level
    }

    /// Human-readable band name.
    pub fn name(self) -> &'static str {
        self.config().name
    }

    /// Band metadata for display layers.
    pub fn config(self) -> &'static MaturityLevelConfig {
        &BANDS[self as usize]
    }

    /// The full band table, worst to best.
    pub fn bands() -> &'static [MaturityLevelConfig; 5] {
        &BANDS
    }
}

/// Classify a percentile into its maturity band.
///
/// # Examples
///
/// ```rust
/// use healthmap::core::Percentile;
/// use healthmap::maturity::{classify, MaturityLevel};
///
/// let p = Percentile::try_new(55.0).unwrap();
/// assert_eq!(classify(p), MaturityLevel::Good);
/// ```
pub fn classify(percentile: Percentile) -> MaturityLevel {
    let p = percentile.value();
    if p < 30.0 {
        MaturityLevel::NeedsAttention
    } else if p < 45.0 {
        MaturityLevel::BelowAverage
    } else if p < 55.0 {
        MaturityLevel::Average
    } else if p < 70.0 {
        MaturityLevel::Good
    } else {
        MaturityLevel::Excellent
    }
}

/// Classify a raw value, surfacing NaN or out-of-range input as an error
/// instead of silently producing a mid-band level.
pub fn try_classify(raw: f64) -> Result<MaturityLevel, HealthError> {
    Percentile::try_new(raw).map(classify)
}
