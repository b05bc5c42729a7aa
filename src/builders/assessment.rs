//! Full per-entity scoring orchestration.
//!
//! One scoring cycle runs in two phases. First everything needed from the
//! historical store is captured: one [`HistoryView`] per outcome, the prior
//! per-dimension scores, and the cohort's latest overall scores. Then the
//! pure pipeline runs over those captures (dimension CSS, risk-adjusted
//! maturity, outcome confidence, executive summary) without touching the
//! store again. Appending the finished scores back is a separate explicit
//! step, at most once per completed assessment.

use crate::config::HealthmapConfig;
use crate::confidence::{evaluate_outcome, OutcomeConfidenceResult};
use crate::core::{
    AssessmentInput, DimensionResult, HistoricalSnapshot, Percentile, Score0To100,
};
use crate::errors::HealthError;
use crate::history::{HistoryView, SnapshotStore};
use crate::risk::{risk_adjusted_maturity, RiskAdjustedMaturity};
use crate::scoring::with_css;
use crate::summary::{executive_summary, DimensionStanding, ExecutiveSummaryData};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One dimension's fully scored state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionReport {
    pub result: DimensionResult,
    pub risk_adjusted: RiskAdjustedMaturity,
}

/// Complete scoring output for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamScorecard {
    pub entity_id: String,
    pub dimensions: Vec<DimensionReport>,
    pub outcomes: Vec<OutcomeConfidenceResult>,
    /// Mean of outcome final scores; mean of dimension scores when no
    /// outcomes are configured.
    pub overall_score: f64,
    pub summary: ExecutiveSummaryData,
}

/// Scores one team against the configured outcome definitions.
pub struct AssessmentScorer<'a> {
    config: &'a HealthmapConfig,
    peer_teams: Vec<String>,
}

impl<'a> AssessmentScorer<'a> {
    pub fn new(config: &'a HealthmapConfig) -> Self {
        Self {
            config,
            peer_teams: Vec::new(),
        }
    }

    /// Name the comparison cohort used for peer growth and team rank.
    pub fn with_peers(mut self, peer_teams: Vec<String>) -> Self {
        self.peer_teams = peer_teams;
        self
    }

    /// Run one full scoring cycle.
    pub fn score(
        &self,
        input: &AssessmentInput,
        store: &dyn SnapshotStore,
    ) -> Result<TeamScorecard, HealthError> {
        log::debug!(
            "scoring entity {} across {} dimensions and {} outcomes",
            input.entity_id,
            input.dimensions.len(),
            self.config.outcomes.len()
        );

        // Phase 1: consistent read of everything historical.
        let capture = HistoryCapture::take(self.config, input, &self.peer_teams, store);

        // Phase 2: pure computation over the captures.
        let dimensions: Vec<DimensionReport> = input
            .dimensions
            .iter()
            .cloned()
            .map(|dimension| {
                let result = with_css(dimension);
                let base = Percentile::saturating(result.weighting_score());
                let risk_adjusted =
                    risk_adjusted_maturity(base, result.indicators(), &self.config.risk);
                DimensionReport {
                    result,
                    risk_adjusted,
                }
            })
            .collect();

        let mut outcomes = Vec::with_capacity(self.config.outcomes.len());
        for (definition, view) in self.config.outcomes.iter().zip(&capture.outcome_views) {
            outcomes.push(evaluate_outcome(definition, input, view, self.config)?);
        }

        let overall_score = overall_score(&outcomes, &dimensions);

        let standings: Vec<DimensionStanding> = dimensions
            .iter()
            .zip(&capture.previous_dimension_scores)
            .map(|(report, previous)| DimensionStanding {
                dimension_key: report.result.dimension_key.clone(),
                dimension_name: report.result.dimension_name.clone(),
                health_score: report.result.health_score.value(),
                maturity_level: report.risk_adjusted.maturity_level,
                weight: self.narrative_weight(&report.result.dimension_key),
                previous_score: *previous,
            })
            .collect();

        let summary = executive_summary(&standings, overall_score, &capture.cohort_scores);

        Ok(TeamScorecard {
            entity_id: input.entity_id.clone(),
            dimensions,
            outcomes,
            overall_score,
            summary,
        })
    }

    /// How hard a dimension pulls on the summary narrative: the sum of its
    /// weights across all outcome definitions, 1.0 when unreferenced.
    fn narrative_weight(&self, dimension_key: &str) -> f64 {
        let total: f64 = self
            .config
            .outcomes
            .iter()
            .flat_map(|o| &o.dimensions)
            .filter(|d| d.dimension_key == dimension_key)
            .map(|d| d.weight)
            .sum();
        if total > 0.0 {
            total
        } else {
            1.0
        }
    }
}

/// Everything read from the store for one cycle, captured up front.
struct HistoryCapture {
    outcome_views: Vec<HistoryView>,
    previous_dimension_scores: Vec<Option<f64>>,
    cohort_scores: Vec<f64>,
}

impl HistoryCapture {
    fn take(
        config: &HealthmapConfig,
        input: &AssessmentInput,
        peer_teams: &[String],
        store: &dyn SnapshotStore,
    ) -> Self {
        let outcome_views = config
            .outcomes
            .iter()
            .map(|definition| {
                let peer_ids: Vec<String> = peer_teams
                    .iter()
                    .filter(|team| team.as_str() != input.entity_id)
                    .map(|team| outcome_entity_id(team, &definition.id))
                    .collect();
                HistoryView::capture(
                    store,
                    &outcome_entity_id(&input.entity_id, &definition.id),
                    &peer_ids,
                )
            })
            .collect();

        let previous_dimension_scores = input
            .dimensions
            .iter()
            .map(|dimension| {
                store
                    .get_history(&dimension_entity_id(
                        &input.entity_id,
                        &dimension.dimension_key,
                    ))
                    .last()
                    .map(|snapshot| snapshot.score.value())
            })
            .collect();

        let cohort_scores = peer_teams
            .iter()
            .filter(|team| team.as_str() != input.entity_id)
            .filter_map(|team| {
                store
                    .get_history(team)
                    .last()
                    .map(|snapshot| snapshot.score.value())
            })
            .collect();

        Self {
            outcome_views,
            previous_dimension_scores,
            cohort_scores,
        }
    }
}

fn overall_score(outcomes: &[OutcomeConfidenceResult], dimensions: &[DimensionReport]) -> f64 {
    if !outcomes.is_empty() {
        return crate::core::metrics::mean(
            &outcomes.iter().map(|o| o.final_score).collect::<Vec<_>>(),
        );
    }
    crate::core::metrics::mean(
        &dimensions
            .iter()
            .map(|d| d.result.weighting_score())
            .collect::<Vec<_>>(),
    )
}

/// Score many teams in parallel. Each team's cohort is the other teams in
/// the batch; the store is only read, so entities are independent.
pub fn score_batch<S: SnapshotStore + Sync>(
    config: &HealthmapConfig,
    inputs: &[AssessmentInput],
    store: &S,
) -> Vec<Result<TeamScorecard, HealthError>> {
    let all_teams: Vec<String> = inputs.iter().map(|i| i.entity_id.clone()).collect();
    inputs
        .par_iter()
        .map(|input| {
            AssessmentScorer::new(config)
                .with_peers(all_teams.clone())
                .score(input, store)
        })
        .collect()
}

/// Append a completed assessment back into history: one snapshot for the
/// team, one per outcome, one per dimension.
pub fn record_assessment(
    store: &mut dyn SnapshotStore,
    scorecard: &TeamScorecard,
    period: &str,
    period_index: u32,
    recorded_at: DateTime<Utc>,
) {
    let snapshot = |entity_id: String, score: f64| HistoricalSnapshot {
        entity_id,
        period: period.to_string(),
        period_index,
        score: Score0To100::new(score),
        recorded_at,
    };

    store.append_snapshot(snapshot(
        scorecard.entity_id.clone(),
        scorecard.overall_score,
    ));
    for outcome in &scorecard.outcomes {
        store.append_snapshot(snapshot(
            outcome_entity_id(&scorecard.entity_id, &outcome.outcome_id),
            outcome.final_score,
        ));
    }
    for report in &scorecard.dimensions {
        store.append_snapshot(snapshot(
            dimension_entity_id(&scorecard.entity_id, &report.result.dimension_key),
            report.result.weighting_score(),
        ));
    }
}

/// History key for a team's outcome-level series.
pub fn outcome_entity_id(team: &str, outcome_id: &str) -> String {
    format!("{team}/outcome/{outcome_id}")
}

/// History key for a team's dimension-level series.
pub fn dimension_entity_id(team: &str, dimension_key: &str) -> String {
    format!("{team}/dimension/{dimension_key}")
}
