// Export modules for library usage
pub mod builders;
pub mod cli;
pub mod confidence;
pub mod config;
pub mod core;
pub mod errors;
pub mod history;
pub mod io;
pub mod maturity;
pub mod risk;
pub mod scoring;
pub mod summary;

// Re-export commonly used types
pub use crate::core::{
    AssessmentInput, ConfidenceInterval, DimensionResult, DimensionWeight, HistoricalSnapshot,
    Indicator, IndicatorCategory, OutcomeDefinition, Percentile, Score0To100, Trend, TrendPoint,
};

pub use crate::builders::{
    record_assessment, score_batch, AssessmentScorer, DimensionReport, TeamScorecard,
};

pub use crate::confidence::{
    confidence_level, evaluate_outcome, ConfidenceLevel, DimensionContribution,
    OutcomeConfidenceResult,
};

pub use crate::config::{get_config, init_config, HealthmapConfig};

pub use crate::errors::HealthError;

pub use crate::history::{HistoryView, InMemoryStore, SnapshotStore};

pub use crate::maturity::{classify, try_classify, MaturityLevel, MaturityLevelConfig};

pub use crate::risk::{risk_adjusted_maturity, RiskAdjustedMaturity, TierDistribution, TrendBreakdown};

pub use crate::scoring::{
    composite_health_score, dimension_css, trajectory_score, CompositeHealthScore, DimensionSample,
};

pub use crate::summary::{executive_summary, DimensionStanding, ExecutiveSummaryData, TeamRank};

pub use crate::io::{create_writer, OutputFormat, OutputWriter};
