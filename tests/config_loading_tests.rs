use healthmap::{HealthError, HealthmapConfig};
use indoc::indoc;
use std::io::Write;
use tempfile::NamedTempFile;

const FULL_CONFIG: &str = indoc! {r#"
    [weights]
    css = 0.50
    trs = 0.35
    pgs = 0.15

    [risk]
    penalty_per_gap = 2.0
    max_penalty = 20.0

    [trajectory]
    window = 3
    trend_scale = 2.5

    [confidence]
    moderate_floor = 40.0
    high_floor = 60.0
    very_high_floor = 75.0
    critical_gap_cap = 55.0

    [[dimensions]]
    key = "flow"
    name = "Flow"

    [[dimensions]]
    key = "quality"
    name = "Quality"

    [[outcomes]]
    id = "delivery"
    name = "Delivery"

    [[outcomes.dimensions]]
    dimension_key = "flow"
    weight = 2.0
    critical_threshold = 35.0
    rationale = "flow dominates delivery"

    [[outcomes.dimensions]]
    dimension_key = "quality"
    weight = 1.0
"#};

#[test]
fn test_full_config_file_loads() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(FULL_CONFIG.as_bytes()).unwrap();

    let config = HealthmapConfig::load_from(file.path()).unwrap();
    assert_eq!(config.dimensions.len(), 2);
    let outcome = config.outcome("delivery").unwrap();
    assert_eq!(outcome.dimensions[0].critical_threshold, Some(35.0));
    assert_eq!(outcome.dimensions[0].weight, 2.0);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let err = HealthmapConfig::load_from(std::path::Path::new("/no/such/file.toml")).unwrap_err();
    assert!(matches!(err, HealthError::Io { .. }));
}

#[test]
fn test_bad_weights_rejected_at_load() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        indoc! {r#"
        [weights]
        css = 0.9
        trs = 0.9
        pgs = 0.9
    "#}
        .as_bytes(),
    )
    .unwrap();

    let err = HealthmapConfig::load_from(file.path()).unwrap_err();
    assert!(matches!(err, HealthError::Config(_)));
}

#[test]
fn test_drifted_outcome_reference_rejected_at_load() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        indoc! {r#"
        [[dimensions]]
        key = "flow"
        name = "Flow"

        [[outcomes]]
        id = "delivery"
        name = "Delivery"

        [[outcomes.dimensions]]
        dimension_key = "throughput"
        weight = 1.0
    "#}
        .as_bytes(),
    )
    .unwrap();

    let err = HealthmapConfig::load_from(file.path()).unwrap_err();
    match err {
        HealthError::UnknownDimension {
            outcome,
            dimension_key,
        } => {
            assert_eq!(outcome, "delivery");
            assert_eq!(dimension_key, "throughput");
        }
        other => panic!("expected UnknownDimension, got {other:?}"),
    }
}
