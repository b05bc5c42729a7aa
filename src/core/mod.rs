//! Shared data model for the health scoring pipeline.
//!
//! Everything here is a plain serializable record: inputs arrive from the
//! assessment layer (or JSON files via [`crate::io`]), outputs go to whatever
//! presentation transport the caller uses. No type in this module owns
//! behavior beyond small derivation helpers.

pub mod metrics;
pub mod score_types;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use score_types::{Percentile, Score0To100};

/// Direction of an indicator or dimension over its recent measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

/// One point of an indicator's time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: String,
    pub value: f64,
}

/// A single measured indicator. Read-only input to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: String,
    /// Raw measured value, unit depends on the indicator.
    pub value: f64,
    /// Preformatted display string ("4.2 days", "87%").
    pub display_value: String,
    /// Percentile rank against the benchmark population. The indicator's
    /// maturity tier is always derived from this, never stored.
    pub percentile: Percentile,
    pub trend: Trend,
    #[serde(default)]
    pub trend_points: Vec<TrendPoint>,
}

/// Named group of indicators inside a dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorCategory {
    pub name: String,
    pub indicators: Vec<Indicator>,
}

/// Assessed state of one health dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionResult {
    /// Unique key within one assessment.
    pub dimension_key: String,
    pub dimension_name: String,
    pub health_score: Score0To100,
    /// Current-state score when the scorer has computed one; falls back to
    /// `health_score` in every weighted aggregation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_score: Option<Score0To100>,
    pub trend: Trend,
    #[serde(default)]
    pub categories: Vec<IndicatorCategory>,
}

impl DimensionResult {
    /// Score used in weighted aggregations: `css_score` when present,
    /// otherwise `health_score`.
    pub fn weighting_score(&self) -> f64 {
        self.css_score.unwrap_or(self.health_score).value()
    }

    /// Iterate all indicators across categories in declaration order.
    pub fn indicators(&self) -> impl Iterator<Item = &Indicator> {
        self.categories.iter().flat_map(|c| c.indicators.iter())
    }
}

/// Weighted reference from an outcome to a dimension.
///
/// Weights are relative, not normalized; the engine divides by their sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionWeight {
    pub dimension_key: String,
    pub weight: f64,
    /// Health score floor below which this dimension is a critical gap for
    /// the outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_threshold: Option<f64>,
    #[serde(default)]
    pub rationale: String,
}

/// Static definition of a business outcome as a weighted set of dimensions.
///
/// Loaded once with the configuration and immutable at runtime. Dimension
/// order is meaningful: it is the declaration order used for tie-breaking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeDefinition {
    pub id: String,
    pub name: String,
    pub dimensions: Vec<DimensionWeight>,
}

/// One recorded score for an entity at a period. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSnapshot {
    pub entity_id: String,
    /// Display label for the period ("2026-Q2", "Sprint 41").
    pub period: String,
    /// Total order of periods; trajectory windows are taken over snapshots
    /// sorted by this index.
    pub period_index: u32,
    pub score: Score0To100,
    pub recorded_at: DateTime<Utc>,
}

/// Complete assessment of one team: the engine's top-level input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInput {
    pub entity_id: String,
    pub dimensions: Vec<DimensionResult>,
}

impl AssessmentInput {
    /// Look up an assessed dimension by key.
    pub fn dimension(&self, key: &str) -> Option<&DimensionResult> {
        self.dimensions.iter().find(|d| d.dimension_key == key)
    }
}

/// Symmetric 95% confidence interval around a score, clamped to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub low: f64,
    pub high: f64,
}

impl ConfidenceInterval {
    pub fn around(center: f64, half_width: f64) -> Self {
        Self {
            low: (center - half_width).clamp(0.0, 100.0),
            high: (center + half_width).clamp(0.0, 100.0),
        }
    }
}
