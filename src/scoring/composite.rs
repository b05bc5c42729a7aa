//! Composite Health Score: CSS blended with trajectory and peer growth.
//!
//! Three components feed the blend:
//!
//! - **CSS**: weighted average of contributing dimension scores; missing
//!   contributions keep their weight in the denominator and contribute 0.
//! - **TRS**: early-window vs recent-window comparison of the entity's own
//!   history, centered at 50 (no change). Needs at least two points.
//! - **PGS**: percentile rank of the entity's TRS among peer TRS values.
//!   Needs the entity's own TRS and at least one peer with one.
//!
//! Nominal weights are 0.50/0.35/0.15. When a component is unavailable its
//! weight is redistributed proportionally across the rest, degenerating to
//! pure CSS when no history exists at all; `components_available` records
//! which terms actually contributed. The whole computation is a pure
//! function of its inputs.

use crate::config::{ChsWeights, TrajectoryConfig};
use crate::core::metrics::{percentile_rank, weighted_variance};
use crate::core::ConfidenceInterval;
use crate::history::{trajectory_windows, HistoryView};
use serde::{Deserialize, Serialize};

/// Half-width multiplier for the 95% confidence interval.
const CI_95_Z: f64 = 1.96;

/// One dimension's contribution to an aggregate score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionSample {
    /// CSS (or health score fallback) of the dimension; 0.0 when missing.
    pub score: f64,
    /// Relative weight in the aggregate.
    pub weight: f64,
    /// True when the dimension was not assessed. The weight still counts.
    pub missing: bool,
}

/// Which blend components contributed to a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentsAvailable {
    pub css: bool,
    pub trs: bool,
    pub pgs: bool,
}

/// A fully computed composite health score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeHealthScore {
    /// Current state score, the "raw" component.
    pub css: f64,
    /// Trajectory score; `None` below two historical points.
    pub trs: Option<f64>,
    /// Peer growth score; `None` without an own TRS or any peer TRS.
    pub pgs: Option<f64>,
    /// Blended score in [0, 100].
    pub score: f64,
    pub components_available: ComponentsAvailable,
    /// Standard error of the weighted dimension contributions.
    pub standard_error: f64,
    pub confidence_interval: ConfidenceInterval,
    /// Number of observed (non-missing) contributing dimensions.
    pub sample_size: usize,
}

impl CompositeHealthScore {
    /// Interval with this score's spread centered on another value, for
    /// callers that cap or shift the blended score downstream.
    pub fn interval_around(&self, center: f64) -> ConfidenceInterval {
        ConfidenceInterval::around(center, CI_95_Z * self.standard_error)
    }
}

/// Current-state score over contributions. Missing samples keep their
/// weight in the denominator; zero total weight yields 0, never NaN.
pub fn current_state_score(samples: &[DimensionSample]) -> f64 {
    let total_weight: f64 = samples.iter().map(|s| s.weight).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    let weighted_sum: f64 = samples
        .iter()
        .filter(|s| !s.missing)
        .map(|s| s.score * s.weight)
        .sum();
    (weighted_sum / total_weight).clamp(0.0, 100.0)
}

/// Trajectory score of a period-ordered series: 50 means flat, above 50
/// improving, below declining. `None` below two points.
pub fn trajectory_score(series: &[f64], config: &TrajectoryConfig) -> Option<f64> {
    let (early, recent) = trajectory_windows(series, config.window)?;
    Some((50.0 + config.trend_scale * (recent - early)).clamp(0.0, 100.0))
}

/// Percentile rank of the entity's TRS among its peers' TRS values.
///
/// Peers without enough history to have a TRS of their own drop out of the
/// population; `None` when nobody is left or the entity has no TRS.
pub fn peer_growth_score(
    own_trs: Option<f64>,
    view: &HistoryView,
    config: &TrajectoryConfig,
) -> Option<f64> {
    let own = own_trs?;
    let peer_trs: Vec<f64> = view
        .peer_scores()
        .iter()
        .filter_map(|(_, series)| trajectory_score(series, config))
        .collect();
    percentile_rank(own, &peer_trs)
}

/// Compute the full composite score for one entity.
///
/// `view` must be captured once at the start of the computation cycle; this
/// function never touches the store.
pub fn composite_health_score(
    samples: &[DimensionSample],
    view: &HistoryView,
    weights: &ChsWeights,
    trajectory: &TrajectoryConfig,
) -> CompositeHealthScore {
    let css = current_state_score(samples);
    let trs = trajectory_score(view.entity_scores(), trajectory);
    let pgs = peer_growth_score(trs, view, trajectory);

    let score = blend(css, trs, pgs, weights);

    let observed: Vec<(f64, f64)> = samples
        .iter()
        .filter(|s| !s.missing)
        .map(|s| (s.score, s.weight))
        .collect();
    let sample_size = observed.len();
    let standard_error = standard_error(&observed);

    CompositeHealthScore {
        css,
        trs,
        pgs,
        score,
        components_available: ComponentsAvailable {
            css: true,
            trs: trs.is_some(),
            pgs: pgs.is_some(),
        },
        standard_error,
        confidence_interval: ConfidenceInterval::around(score, CI_95_Z * standard_error),
        sample_size,
    }
}

/// Blend available components, renormalizing the nominal weights over
/// whatever is present. CSS is always present, so the result is always
/// defined and in [0, 100].
fn blend(css: f64, trs: Option<f64>, pgs: Option<f64>, weights: &ChsWeights) -> f64 {
    let mut weighted_sum = css * weights.css;
    let mut weight_total = weights.css;
    if let Some(trs) = trs {
        weighted_sum += trs * weights.trs;
        weight_total += weights.trs;
    }
    if let Some(pgs) = pgs {
        weighted_sum += pgs * weights.pgs;
        weight_total += weights.pgs;
    }
    (weighted_sum / weight_total).clamp(0.0, 100.0)
}

/// Standard error of the weighted contribution spread: the weighted
/// population standard deviation shrunk by the square root of the sample
/// size. Single-dimension outcomes report 0 spread rather than a guess.
fn standard_error(observed: &[(f64, f64)]) -> f64 {
    if observed.is_empty() {
        return 0.0;
    }
    (weighted_variance(observed) / observed.len() as f64).sqrt()
}
