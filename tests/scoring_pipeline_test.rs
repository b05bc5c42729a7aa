//! Multi-period pipeline test: score, record, rescore with trajectory and
//! peer context, then roll up the executive view.

use chrono::{TimeZone, Utc};
use healthmap::config::DimensionSpec;
use healthmap::{
    record_assessment, score_batch, AssessmentInput, AssessmentScorer, DimensionResult,
    DimensionWeight, HealthmapConfig, InMemoryStore, OutcomeDefinition, Score0To100, SnapshotStore,
    Trend,
};
use pretty_assertions::assert_eq;

fn config() -> HealthmapConfig {
    HealthmapConfig {
        dimensions: vec![
            DimensionSpec {
                key: "flow".to_string(),
                name: "Flow".to_string(),
            },
            DimensionSpec {
                key: "quality".to_string(),
                name: "Quality".to_string(),
            },
        ],
        outcomes: vec![OutcomeDefinition {
            id: "delivery".to_string(),
            name: "Delivery".to_string(),
            dimensions: vec![
                DimensionWeight {
                    dimension_key: "flow".to_string(),
                    weight: 2.0,
                    critical_threshold: None,
                    rationale: "flow dominates delivery".to_string(),
                },
                DimensionWeight {
                    dimension_key: "quality".to_string(),
                    weight: 1.0,
                    critical_threshold: None,
                    rationale: String::new(),
                },
            ],
        }],
        ..HealthmapConfig::default()
    }
}

fn dimension(key: &str, health: f64) -> DimensionResult {
    DimensionResult {
        dimension_key: key.to_string(),
        dimension_name: key.to_string(),
        health_score: Score0To100::new(health),
        css_score: None,
        trend: Trend::Stable,
        categories: vec![],
    }
}

fn input(team: &str, health: f64) -> AssessmentInput {
    AssessmentInput {
        entity_id: team.to_string(),
        dimensions: vec![dimension("flow", health), dimension("quality", health)],
    }
}

/// Record two earlier periods for three teams: one climbing, one flat,
/// one declining.
fn seed_two_periods(config: &HealthmapConfig) -> InMemoryStore {
    let mut store = InMemoryStore::new();
    let teams: Vec<String> = vec!["team-a".into(), "team-b".into(), "team-c".into()];
    let histories = [
        ("team-a", [40.0, 50.0]),
        ("team-b", [60.0, 60.0]),
        ("team-c", [80.0, 70.0]),
    ];
    for (index, period) in ["2026-Q1", "2026-Q2"].iter().enumerate() {
        for (team, scores) in &histories {
            let scorecard = AssessmentScorer::new(config)
                .with_peers(teams.clone())
                .score(&input(team, scores[index]), &store)
                .unwrap();
            record_assessment(
                &mut store,
                &scorecard,
                period,
                index as u32 + 1,
                Utc.with_ymd_and_hms(2026, 1 + 3 * index as u32, 1, 0, 0, 0).unwrap(),
            );
        }
    }
    store
}

#[test]
fn test_climbing_team_earns_trajectory_and_peer_growth() {
    let config = config();
    let store = seed_two_periods(&config);

    let inputs = vec![input("team-a", 60.0), input("team-b", 60.0), input("team-c", 60.0)];
    let results = score_batch(&config, &inputs, &store);
    let team_a = results[0].as_ref().unwrap();
    let outcome = &team_a.outcomes[0];

    // history 40 -> 50 gives TRS 75; both peers trail, so PGS tops out
    assert_eq!(outcome.trs_score, Some(75.0));
    assert_eq!(outcome.pgs_score, Some(100.0));
    assert!(outcome.components_available.trs);
    assert!(outcome.components_available.pgs);

    // full nominal blend: 0.5*60 + 0.35*75 + 0.15*100
    assert!((outcome.final_score - 71.25).abs() < 1e-9);
}

#[test]
fn test_declining_team_ranks_last_among_peers() {
    let config = config();
    let store = seed_two_periods(&config);

    let inputs = vec![input("team-a", 60.0), input("team-b", 60.0), input("team-c", 60.0)];
    let results = score_batch(&config, &inputs, &store);
    let team_c = results[2].as_ref().unwrap();
    let outcome = &team_c.outcomes[0];

    // history 80 -> 70 gives TRS 25, worst of the cohort
    assert_eq!(outcome.trs_score, Some(25.0));
    assert_eq!(outcome.pgs_score, Some(0.0));
    assert!(outcome.final_score < 60.0);
}

#[test]
fn test_executive_summary_reflects_movement_and_rank() {
    let config = config();
    let store = seed_two_periods(&config);

    let scorecard = AssessmentScorer::new(&config)
        .with_peers(vec!["team-a".into(), "team-b".into(), "team-c".into()])
        .score(&input("team-a", 60.0), &store)
        .unwrap();

    let summary = &scorecard.summary;
    // flow +10 at weight 2, quality +10 at weight 1
    assert_eq!(summary.trend_delta, 30.0);
    assert_eq!(summary.biggest_gain.as_ref().unwrap().dimension_key, "flow");
    assert_eq!(summary.biggest_decline, None);

    // dimensions at 60 classify Good: both are strengths
    assert_eq!(summary.strengths.len(), 2);
    assert!(summary.risks.is_empty());

    // cohort latest overall scores are 60 and 70; team-a blends past both
    let rank = summary.team_rank.unwrap();
    assert_eq!(rank.rank, 1);
    assert_eq!(rank.cohort_size, 3);
}

#[test]
fn test_first_period_has_no_trajectory_anywhere() {
    let config = config();
    let store = InMemoryStore::new();

    let inputs = vec![input("team-a", 55.0), input("team-b", 65.0)];
    let results = score_batch(&config, &inputs, &store);
    for result in &results {
        let scorecard = result.as_ref().unwrap();
        let outcome = &scorecard.outcomes[0];
        assert_eq!(outcome.trs_score, None);
        assert_eq!(outcome.pgs_score, None);
        assert_eq!(outcome.final_score, outcome.css_score);
        assert_eq!(scorecard.summary.team_rank, None);
    }
}

#[test]
fn test_store_appends_are_isolated_per_period() {
    let config = config();
    let mut store = seed_two_periods(&config);

    let before = store.get_history("team-a/outcome/delivery").len();
    let scorecard = AssessmentScorer::new(&config)
        .score(&input("team-a", 60.0), &store)
        .unwrap();
    // scoring alone never writes
    assert_eq!(store.get_history("team-a/outcome/delivery").len(), before);

    record_assessment(
        &mut store,
        &scorecard,
        "2026-Q3",
        3,
        Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap(),
    );
    assert_eq!(store.get_history("team-a/outcome/delivery").len(), before + 1);
}
