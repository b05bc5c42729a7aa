//! Outcome confidence: weighted dimension contributions rolled into one
//! capped, confidence-leveled score.
//!
//! An outcome definition names the dimensions it depends on and how hard
//! each one pulls. The engine walks those references in declaration order,
//! feeds the present ones into the composite score, and then applies the
//! critical-gap cap: one breached threshold caps the outcome at the
//! configured ceiling no matter what the blend said. Dimensions the
//! definition references but the assessment lacks contribute zero while
//! keeping their weight: an outcome built on unassessed ground should
//! score worse, not the same.

use crate::config::{ConfidenceConfig, HealthmapConfig};
use crate::core::{AssessmentInput, ConfidenceInterval, OutcomeDefinition, Trend};
use crate::errors::HealthError;
use crate::scoring::{composite_health_score, ComponentsAvailable, DimensionSample};
use crate::history::HistoryView;
use serde::{Deserialize, Serialize};

/// Qualitative confidence band over an outcome's final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfidenceLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

/// Map a final score to its confidence band. Fixed ascending floors, same
/// style as maturity classification.
pub fn confidence_level(score: f64, config: &ConfidenceConfig) -> ConfidenceLevel {
    if score >= config.very_high_floor {
        ConfidenceLevel::VeryHigh
    } else if score >= config.high_floor {
        ConfidenceLevel::High
    } else if score >= config.moderate_floor {
        ConfidenceLevel::Moderate
    } else {
        ConfidenceLevel::Low
    }
}

/// One dimension's contribution to an outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionContribution {
    pub dimension_key: String,
    pub weight: f64,
    /// Reported health score; 0.0 when the dimension is missing.
    pub health_score: f64,
    pub weighted_score: f64,
    pub is_critical_gap: bool,
    pub is_missing: bool,
}

/// Fully evaluated outcome. Ephemeral, a pure function of its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeConfidenceResult {
    pub outcome_id: String,
    pub outcome_name: String,
    /// CSS before trajectory and peer blending.
    pub raw_score: f64,
    /// Blended score after the critical-gap cap.
    pub final_score: f64,
    pub css_score: f64,
    pub trs_score: Option<f64>,
    pub pgs_score: Option<f64>,
    pub standard_error: f64,
    pub confidence_interval: ConfidenceInterval,
    pub contributions: Vec<DimensionContribution>,
    /// Keys of contributions that breached their critical threshold.
    pub critical_gaps: Vec<String>,
    pub trend: Trend,
    pub confidence_level: ConfidenceLevel,
    pub components_available: ComponentsAvailable,
}

/// Evaluate one outcome against an assessment.
///
/// `view` is the consistent history read for this entity+outcome, captured
/// before evaluation starts. A definition referencing a dimension key
/// outside the config registry is configuration drift and fails loudly; a
/// registered dimension merely absent from this assessment is recoverable
/// and reported via `is_missing`.
pub fn evaluate_outcome(
    definition: &OutcomeDefinition,
    assessment: &AssessmentInput,
    view: &HistoryView,
    config: &HealthmapConfig,
) -> Result<OutcomeConfidenceResult, HealthError> {
    let mut contributions = Vec::with_capacity(definition.dimensions.len());
    let mut samples = Vec::with_capacity(definition.dimensions.len());

    for dim_weight in &definition.dimensions {
        if !config.is_registered_dimension(&dim_weight.dimension_key) {
            return Err(HealthError::UnknownDimension {
                outcome: definition.id.clone(),
                dimension_key: dim_weight.dimension_key.clone(),
            });
        }

        match assessment.dimension(&dim_weight.dimension_key) {
            Some(dimension) => {
                let score = dimension.weighting_score();
                let health = dimension.health_score.value();
                let is_critical_gap = dim_weight
                    .critical_threshold
                    .map(|threshold| health < threshold)
                    .unwrap_or(false);
                contributions.push(DimensionContribution {
                    dimension_key: dim_weight.dimension_key.clone(),
                    weight: dim_weight.weight,
                    health_score: health,
                    weighted_score: score * dim_weight.weight,
                    is_critical_gap,
                    is_missing: false,
                });
                samples.push(DimensionSample {
                    score,
                    weight: dim_weight.weight,
                    missing: false,
                });
            }
            None => {
                // Missing dimensions are never critical gaps, whatever
                // their threshold says.
                contributions.push(DimensionContribution {
                    dimension_key: dim_weight.dimension_key.clone(),
                    weight: dim_weight.weight,
                    health_score: 0.0,
                    weighted_score: 0.0,
                    is_critical_gap: false,
                    is_missing: true,
                });
                samples.push(DimensionSample {
                    score: 0.0,
                    weight: dim_weight.weight,
                    missing: true,
                });
            }
        }
    }

    let composite = composite_health_score(&samples, view, &config.weights, &config.trajectory);

    let critical_gaps: Vec<String> = contributions
        .iter()
        .filter(|c| c.is_critical_gap)
        .map(|c| c.dimension_key.clone())
        .collect();

    let final_score = if critical_gaps.is_empty() {
        composite.score
    } else {
        composite.score.min(config.confidence.critical_gap_cap)
    };

    Ok(OutcomeConfidenceResult {
        outcome_id: definition.id.clone(),
        outcome_name: definition.name.clone(),
        raw_score: composite.css,
        final_score,
        css_score: composite.css,
        trs_score: composite.trs,
        pgs_score: composite.pgs,
        standard_error: composite.standard_error,
        confidence_interval: composite.interval_around(final_score),
        trend: outcome_trend(definition, assessment),
        confidence_level: confidence_level(final_score, &config.confidence),
        components_available: composite.components_available,
        contributions,
        critical_gaps,
    })
}

/// Overall trend of the outcome: the weighted balance of its present
/// dimensions' trends.
fn outcome_trend(definition: &OutcomeDefinition, assessment: &AssessmentInput) -> Trend {
    let mut net = 0.0;
    for dim_weight in &definition.dimensions {
        if let Some(dimension) = assessment.dimension(&dim_weight.dimension_key) {
            match dimension.trend {
                Trend::Improving => net += dim_weight.weight,
                Trend::Declining => net -= dim_weight.weight,
                Trend::Stable => {}
            }
        }
    }
    if net > 0.0 {
        Trend::Improving
    } else if net < 0.0 {
        Trend::Declining
    } else {
        Trend::Stable
    }
}
