//! Risk-adjusted maturity for a dimension.
//!
//! A dimension's base percentile tells you where it stands today; its
//! indicator mix tells you how much that standing should be trusted. A
//! cluster of needs-attention indicators drags the percentile down, a net
//! improving trend nudges it up, and the result is reclassified into a
//! maturity band. Pure and idempotent: identical inputs always produce the
//! identical record.

use crate::config::RiskConfig;
use crate::core::{Indicator, Percentile, Trend};
use crate::maturity::{classify, MaturityLevel};
use serde::{Deserialize, Serialize};

/// Count of indicators per maturity band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDistribution {
    pub needs_attention: usize,
    pub below_average: usize,
    pub average: usize,
    pub good: usize,
    pub excellent: usize,
}

impl TierDistribution {
    fn record(&mut self, level: MaturityLevel) {
        match level {
            MaturityLevel::NeedsAttention => self.needs_attention += 1,
            MaturityLevel::BelowAverage => self.below_average += 1,
            MaturityLevel::Average => self.average += 1,
            MaturityLevel::Good => self.good += 1,
            MaturityLevel::Excellent => self.excellent += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.needs_attention + self.below_average + self.average + self.good + self.excellent
    }
}

/// Count of indicators per trend direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendBreakdown {
    pub improving: usize,
    pub stable: usize,
    pub declining: usize,
}

impl TrendBreakdown {
    fn record(&mut self, trend: Trend) {
        match trend {
            Trend::Improving => self.improving += 1,
            Trend::Stable => self.stable += 1,
            Trend::Declining => self.declining += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.improving + self.stable + self.declining
    }
}

/// Result of one risk adjustment. Ephemeral, computed per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAdjustedMaturity {
    pub base_percentile: f64,
    pub risk_penalty: f64,
    pub trend_adjustment: f64,
    pub adjusted_percentile: f64,
    pub maturity_level: MaturityLevel,
    pub tier_distribution: TierDistribution,
    pub trend_breakdown: TrendBreakdown,
    /// True when the adjustment moved the dimension across a band boundary
    /// or by at least the configured significance delta.
    pub was_significantly_adjusted: bool,
}

/// Adjust a dimension's percentile by indicator-tier risk density and trend
/// direction, then reclassify.
///
/// - penalty: `min(needs_attention_count × penalty_per_gap, max_penalty)`
/// - trend adjustment: linear in the net improving/declining balance,
///   `max_trend_adjustment × (improving − declining) / total`, zero when
///   balanced or when there are no indicators
pub fn risk_adjusted_maturity<'a>(
    base_percentile: Percentile,
    indicators: impl IntoIterator<Item = &'a Indicator>,
    config: &RiskConfig,
) -> RiskAdjustedMaturity {
    let mut tiers = TierDistribution::default();
    let mut trends = TrendBreakdown::default();
    for indicator in indicators {
        tiers.record(classify(indicator.percentile));
        trends.record(indicator.trend);
    }

    let risk_penalty =
        (tiers.needs_attention as f64 * config.penalty_per_gap).min(config.max_penalty);
    let trend_adjustment = trend_adjustment(&trends, config);

    let base = base_percentile.value();
    let adjusted = Percentile::saturating(base - risk_penalty + trend_adjustment);

    let base_level = classify(base_percentile);
    let maturity_level = classify(adjusted);
    let was_significantly_adjusted =
        maturity_level != base_level || (adjusted.value() - base).abs() >= config.significant_delta;

    RiskAdjustedMaturity {
        base_percentile: base,
        risk_penalty,
        trend_adjustment,
        adjusted_percentile: adjusted.value(),
        maturity_level,
        tier_distribution: tiers,
        trend_breakdown: trends,
        was_significantly_adjusted,
    }
}

fn trend_adjustment(trends: &TrendBreakdown, config: &RiskConfig) -> f64 {
    let total = trends.total();
    if total == 0 {
        return 0.0;
    }
    let net = trends.improving as f64 - trends.declining as f64;
    let adjustment = config.max_trend_adjustment * net / total as f64;
    adjustment.clamp(-config.max_trend_adjustment, config.max_trend_adjustment)
}
