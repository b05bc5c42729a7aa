//! Immutable process-wide configuration.
//!
//! Everything that used to be a scattered module constant lives here:
//! composite score weights, risk penalty parameters, trajectory windows,
//! confidence bands, the dimension registry, and the static outcome
//! definitions. Loaded once (optionally from `.healthmap.toml`), validated,
//! then cached in a `OnceLock`. No mutation after init.

use crate::core::OutcomeDefinition;
use crate::errors::HealthError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Nominal blend weights for the Composite Health Score.
///
/// CSS/TRS/PGS at 0.50/0.35/0.15. When a component is unavailable its
/// weight is redistributed proportionally at computation time; these
/// values stay fixed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChsWeights {
    #[serde(default = "default_css_weight")]
    pub css: f64,
    #[serde(default = "default_trs_weight")]
    pub trs: f64,
    #[serde(default = "default_pgs_weight")]
    pub pgs: f64,
}

impl Default for ChsWeights {
    fn default() -> Self {
        Self {
            css: default_css_weight(),
            trs: default_trs_weight(),
            pgs: default_pgs_weight(),
        }
    }
}

impl ChsWeights {
    fn is_valid_weight(weight: f64) -> bool {
        (0.0..=1.0).contains(&weight)
    }

    pub fn validate(&self) -> Result<(), String> {
        for (value, name) in [(self.css, "css"), (self.trs, "trs"), (self.pgs, "pgs")] {
            if !Self::is_valid_weight(value) {
                return Err(format!("{} weight must be between 0.0 and 1.0", name));
            }
        }
        let sum = self.css + self.trs + self.pgs;
        if (sum - 1.0).abs() > 0.001 {
            return Err(format!(
                "composite weights must sum to 1.0, but sum to {:.3}",
                sum
            ));
        }
        Ok(())
    }
}

fn default_css_weight() -> f64 {
    0.50
}

fn default_trs_weight() -> f64 {
    0.35
}

fn default_pgs_weight() -> f64 {
    0.15
}

/// Parameters of the risk-adjusted maturity calculation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Percentile points of penalty per needs-attention indicator.
    #[serde(default = "default_penalty_per_gap")]
    pub penalty_per_gap: f64,
    /// Ceiling on the total risk penalty.
    #[serde(default = "default_max_penalty")]
    pub max_penalty: f64,
    /// Symmetric bound on the trend adjustment.
    #[serde(default = "default_max_trend_adjustment")]
    pub max_trend_adjustment: f64,
    /// Percentile delta at which an adjustment counts as significant.
    #[serde(default = "default_significant_delta")]
    pub significant_delta: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            penalty_per_gap: default_penalty_per_gap(),
            max_penalty: default_max_penalty(),
            max_trend_adjustment: default_max_trend_adjustment(),
            significant_delta: default_significant_delta(),
        }
    }
}

fn default_penalty_per_gap() -> f64 {
    2.0
}

fn default_max_penalty() -> f64 {
    20.0
}

fn default_max_trend_adjustment() -> f64 {
    10.0
}

fn default_significant_delta() -> f64 {
    5.0
}

/// Trajectory comparison parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrajectoryConfig {
    /// Maximum points in each of the early and recent windows.
    #[serde(default = "default_trajectory_window")]
    pub window: usize,
    /// TRS points per point of average score change.
    #[serde(default = "default_trend_scale")]
    pub trend_scale: f64,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            window: default_trajectory_window(),
            trend_scale: default_trend_scale(),
        }
    }
}

fn default_trajectory_window() -> usize {
    3
}

fn default_trend_scale() -> f64 {
    2.5
}

/// Confidence-level band floors and the critical-gap cap.
///
/// Bands mirror the maturity classifier's fixed-threshold style:
/// [0, moderate) Low, [moderate, high) Moderate, [high, very_high) High,
/// [very_high, 100] VeryHigh.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    #[serde(default = "default_moderate_floor")]
    pub moderate_floor: f64,
    #[serde(default = "default_high_floor")]
    pub high_floor: f64,
    #[serde(default = "default_very_high_floor")]
    pub very_high_floor: f64,
    /// Hard ceiling on an outcome's final score when any critical gap is
    /// present. Sits inside the Moderate band so a capped outcome can
    /// never present as High.
    #[serde(default = "default_critical_gap_cap")]
    pub critical_gap_cap: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            moderate_floor: default_moderate_floor(),
            high_floor: default_high_floor(),
            very_high_floor: default_very_high_floor(),
            critical_gap_cap: default_critical_gap_cap(),
        }
    }
}

impl ConfidenceConfig {
    pub fn validate(&self) -> Result<(), String> {
        let floors = [self.moderate_floor, self.high_floor, self.very_high_floor];
        if floors.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err("confidence band floors must be strictly ascending".to_string());
        }
        if floors.iter().any(|f| !(0.0..=100.0).contains(f)) {
            return Err("confidence band floors must be within 0..=100".to_string());
        }
        if !(0.0..=100.0).contains(&self.critical_gap_cap) {
            return Err("critical gap cap must be within 0..=100".to_string());
        }
        Ok(())
    }
}

fn default_moderate_floor() -> f64 {
    40.0
}

fn default_high_floor() -> f64 {
    60.0
}

fn default_very_high_floor() -> f64 {
    75.0
}

fn default_critical_gap_cap() -> f64 {
    55.0
}

/// Registry entry for a known dimension.
///
/// Outcome definitions may only reference registered keys; anything else
/// is configuration drift and fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionSpec {
    pub key: String,
    pub name: String,
}

/// Top-level configuration, loaded once at process start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthmapConfig {
    #[serde(default)]
    pub weights: ChsWeights,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub trajectory: TrajectoryConfig,
    #[serde(default)]
    pub confidence: ConfidenceConfig,
    /// Known dimension registry.
    #[serde(default)]
    pub dimensions: Vec<DimensionSpec>,
    /// Static outcome definitions.
    #[serde(default)]
    pub outcomes: Vec<OutcomeDefinition>,
}

impl HealthmapConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, HealthError> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| HealthError::config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self, HealthError> {
        let contents = fs::read_to_string(path).map_err(|e| HealthError::io(path, e))?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Validate cross-field constraints.
    pub fn validate(&self) -> Result<(), HealthError> {
        self.weights.validate().map_err(HealthError::config)?;
        self.confidence.validate().map_err(HealthError::config)?;
        if self.trajectory.window == 0 {
            return Err(HealthError::config("trajectory window must be at least 1"));
        }
        self.validate_outcome_refs()
    }

    /// Every outcome must reference registered dimension keys with
    /// non-negative weights.
    fn validate_outcome_refs(&self) -> Result<(), HealthError> {
        for outcome in &self.outcomes {
            for dim in &outcome.dimensions {
                if !self.is_registered_dimension(&dim.dimension_key) {
                    return Err(HealthError::UnknownDimension {
                        outcome: outcome.id.clone(),
                        dimension_key: dim.dimension_key.clone(),
                    });
                }
                if dim.weight < 0.0 || dim.weight.is_nan() {
                    return Err(HealthError::config(format!(
                        "outcome '{}' has negative weight for '{}'",
                        outcome.id, dim.dimension_key
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn is_registered_dimension(&self, key: &str) -> bool {
        self.dimensions.iter().any(|d| d.key == key)
    }

    /// Look up an outcome definition, failing loudly on an unknown id.
    pub fn outcome(&self, id: &str) -> Result<&OutcomeDefinition, HealthError> {
        self.outcomes
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| HealthError::UnknownOutcome(id.to_string()))
    }
}

static CONFIG: OnceLock<HealthmapConfig> = OnceLock::new();

/// Install the process-wide configuration. Returns `Err` with the rejected
/// value if one was already installed.
pub fn init_config(config: HealthmapConfig) -> Result<(), HealthmapConfig> {
    CONFIG.set(config)
}

/// The process-wide configuration; defaults when none was installed.
pub fn get_config() -> &'static HealthmapConfig {
    CONFIG.get_or_init(HealthmapConfig::default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_default_weights_are_nominal_blend() {
        let weights = ChsWeights::default();
        assert_eq!(weights.css, 0.50);
        assert_eq!(weights.trs, 0.35);
        assert_eq!(weights.pgs, 0.15);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let weights = ChsWeights {
            css: 0.6,
            trs: 0.35,
            pgs: 0.15,
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_confidence_floors_must_ascend() {
        let bands = ConfidenceConfig {
            moderate_floor: 60.0,
            high_floor: 40.0,
            ..ConfidenceConfig::default()
        };
        assert!(bands.validate().is_err());
    }

    #[test]
    fn test_parse_partial_toml_fills_defaults() {
        let config = HealthmapConfig::from_toml_str(indoc! {r#"
            [trajectory]
            window = 4
        "#})
        .unwrap();
        assert_eq!(config.trajectory.window, 4);
        assert_eq!(config.weights.css, 0.50);
        assert_eq!(config.confidence.critical_gap_cap, 55.0);
    }

    #[test]
    fn test_outcome_referencing_unregistered_dimension_fails() {
        let err = HealthmapConfig::from_toml_str(indoc! {r#"
            [[dimensions]]
            key = "flow"
            name = "Flow"

            [[outcomes]]
            id = "predictability"
            name = "Predictability"

            [[outcomes.dimensions]]
            dimension_key = "velocity"
            weight = 1.0
        "#})
        .unwrap_err();
        assert!(matches!(err, HealthError::UnknownDimension { .. }));
    }

    #[test]
    fn test_unknown_outcome_lookup_is_loud() {
        let config = HealthmapConfig::default();
        assert!(matches!(
            config.outcome("nope"),
            Err(HealthError::UnknownOutcome(_))
        ));
    }
}
