//! Executive summary roll-up: strengths, risks, trend movement, peer rank.
//!
//! Takes the per-dimension standings a scoring cycle already produced and
//! reduces them to the handful of numbers an executive view leads with.
//! Buckets are fixed: a dimension is a risk at maturity level 2 or below
//! and a strength at level 4 or above.

use crate::maturity::MaturityLevel;
use im::Vector;
use serde::{Deserialize, Serialize};

/// One dimension's standing going into the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionStanding {
    pub dimension_key: String,
    pub dimension_name: String,
    pub health_score: f64,
    pub maturity_level: MaturityLevel,
    /// Narrative weight; how hard this dimension pulls on the trend delta
    /// and the mover tie-breaks.
    pub weight: f64,
    /// Score at the most recent prior snapshot, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_score: Option<f64>,
}

/// A dimension surfaced as a strength or a risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionHighlight {
    pub dimension_key: String,
    pub dimension_name: String,
    pub maturity_level: MaturityLevel,
    pub health_score: f64,
}

/// Score movement of one dimension since the prior snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionDelta {
    pub dimension_key: String,
    pub change: f64,
    pub weight: f64,
}

/// Ordinal standing among a comparison cohort: "rank of cohort_size".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRank {
    pub rank: usize,
    pub cohort_size: usize,
}

/// The summary record handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummaryData {
    pub strengths: Vector<DimensionHighlight>,
    pub risks: Vector<DimensionHighlight>,
    /// Weighted sum of per-dimension score changes vs the prior snapshot.
    pub trend_delta: f64,
    pub biggest_gain: Option<DimensionDelta>,
    pub biggest_decline: Option<DimensionDelta>,
    pub team_rank: Option<TeamRank>,
}

/// Roll dimension standings into the executive summary.
///
/// `cohort_scores` are the comparison teams' overall scores, excluding this
/// team; rank is ordinal with rank 1 for the best score and this team
/// counted into the cohort size.
pub fn executive_summary(
    standings: &[DimensionStanding],
    own_score: f64,
    cohort_scores: &[f64],
) -> ExecutiveSummaryData {
    let strengths = highlights(standings, |level| level >= MaturityLevel::Good);
    let risks = highlights(standings, |level| level <= MaturityLevel::BelowAverage);

    let deltas: Vec<DimensionDelta> = standings
        .iter()
        .filter_map(|s| {
            s.previous_score.map(|previous| DimensionDelta {
                dimension_key: s.dimension_key.clone(),
                change: s.health_score - previous,
                weight: s.weight,
            })
        })
        .collect();

    let trend_delta = deltas.iter().map(|d| d.change * d.weight).sum();
    let biggest_gain = pick_mover(&deltas, |d| d.change > 0.0, |a, b| a.change > b.change);
    let biggest_decline = pick_mover(&deltas, |d| d.change < 0.0, |a, b| a.change < b.change);

    ExecutiveSummaryData {
        strengths,
        risks,
        trend_delta,
        biggest_gain,
        biggest_decline,
        team_rank: team_rank(own_score, cohort_scores),
    }
}

fn highlights(
    standings: &[DimensionStanding],
    select: impl Fn(MaturityLevel) -> bool,
) -> Vector<DimensionHighlight> {
    standings
        .iter()
        .filter(|s| select(s.maturity_level))
        .map(|s| DimensionHighlight {
            dimension_key: s.dimension_key.clone(),
            dimension_name: s.dimension_name.clone(),
            maturity_level: s.maturity_level,
            health_score: s.health_score,
        })
        .collect()
}

/// Single biggest mover in one direction. Ties go to the larger absolute
/// weight; remaining ties keep the earliest declared dimension.
fn pick_mover(
    deltas: &[DimensionDelta],
    eligible: impl Fn(&DimensionDelta) -> bool,
    beats: impl Fn(&DimensionDelta, &DimensionDelta) -> bool,
) -> Option<DimensionDelta> {
    let mut best: Option<&DimensionDelta> = None;
    for delta in deltas.iter().filter(|d| eligible(d)) {
        best = match best {
            None => Some(delta),
            Some(current) => {
                if beats(delta, current)
                    || (delta.change == current.change
                        && delta.weight.abs() > current.weight.abs())
                {
                    Some(delta)
                } else {
                    Some(current)
                }
            }
        };
    }
    best.cloned()
}

fn team_rank(own_score: f64, cohort_scores: &[f64]) -> Option<TeamRank> {
    if cohort_scores.is_empty() {
        return None;
    }
    let rank = 1 + cohort_scores.iter().filter(|&&s| s > own_score).count();
    Some(TeamRank {
        rank,
        cohort_size: cohort_scores.len() + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn standing(
        key: &str,
        health: f64,
        level: MaturityLevel,
        weight: f64,
        previous: Option<f64>,
    ) -> DimensionStanding {
        DimensionStanding {
            dimension_key: key.to_string(),
            dimension_name: key.to_string(),
            health_score: health,
            maturity_level: level,
            weight,
            previous_score: previous,
        }
    }

    #[test]
    fn test_bucketing_by_maturity_level() {
        let standings = vec![
            standing("flow", 80.0, MaturityLevel::Excellent, 1.0, None),
            standing("quality", 60.0, MaturityLevel::Good, 1.0, None),
            standing("focus", 50.0, MaturityLevel::Average, 1.0, None),
            standing("stability", 40.0, MaturityLevel::BelowAverage, 1.0, None),
            standing("speed", 20.0, MaturityLevel::NeedsAttention, 1.0, None),
        ];
        let summary = executive_summary(&standings, 50.0, &[]);
        let strength_keys: Vec<_> = summary
            .strengths
            .iter()
            .map(|h| h.dimension_key.as_str())
            .collect();
        let risk_keys: Vec<_> = summary
            .risks
            .iter()
            .map(|h| h.dimension_key.as_str())
            .collect();
        assert_eq!(strength_keys, vec!["flow", "quality"]);
        assert_eq!(risk_keys, vec!["stability", "speed"]);
    }

    #[test]
    fn test_trend_delta_is_weighted_sum_of_changes() {
        let standings = vec![
            standing("flow", 70.0, MaturityLevel::Good, 2.0, Some(60.0)),
            standing("quality", 55.0, MaturityLevel::Good, 1.0, Some(60.0)),
            standing("focus", 50.0, MaturityLevel::Average, 3.0, None),
        ];
        let summary = executive_summary(&standings, 60.0, &[]);
        // 2*(+10) + 1*(-5); no previous means no contribution
        assert_eq!(summary.trend_delta, 15.0);
    }

    #[test]
    fn test_biggest_movers_by_direction() {
        let standings = vec![
            standing("flow", 70.0, MaturityLevel::Good, 1.0, Some(62.0)),
            standing("quality", 75.0, MaturityLevel::Excellent, 1.0, Some(55.0)),
            standing("focus", 40.0, MaturityLevel::BelowAverage, 1.0, Some(52.0)),
        ];
        let summary = executive_summary(&standings, 60.0, &[]);
        assert_eq!(summary.biggest_gain.unwrap().dimension_key, "quality");
        assert_eq!(summary.biggest_decline.unwrap().dimension_key, "focus");
    }

    #[test]
    fn test_mover_ties_prefer_heavier_weight_then_declaration_order() {
        let standings = vec![
            standing("flow", 70.0, MaturityLevel::Good, 1.0, Some(60.0)),
            standing("quality", 80.0, MaturityLevel::Excellent, 2.0, Some(70.0)),
            standing("focus", 65.0, MaturityLevel::Good, 2.0, Some(55.0)),
        ];
        // all gained exactly 10; quality and focus share the top weight,
        // quality is declared first
        let summary = executive_summary(&standings, 70.0, &[]);
        assert_eq!(summary.biggest_gain.unwrap().dimension_key, "quality");
    }

    #[test]
    fn test_no_history_means_no_movers() {
        let standings = vec![standing("flow", 70.0, MaturityLevel::Good, 1.0, None)];
        let summary = executive_summary(&standings, 70.0, &[]);
        assert_eq!(summary.trend_delta, 0.0);
        assert_eq!(summary.biggest_gain, None);
        assert_eq!(summary.biggest_decline, None);
    }

    #[test]
    fn test_team_rank_is_ordinal_within_cohort() {
        let standings = vec![];
        let summary = executive_summary(&standings, 62.0, &[70.0, 55.0, 62.0, 80.0]);
        // two cohort teams score strictly higher
        assert_eq!(
            summary.team_rank,
            Some(TeamRank {
                rank: 3,
                cohort_size: 5
            })
        );
    }

    #[test]
    fn test_rank_absent_without_cohort() {
        let summary = executive_summary(&[], 62.0, &[]);
        assert_eq!(summary.team_rank, None);
    }
}
