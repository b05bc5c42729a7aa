pub mod assessment;

pub use assessment::{
    record_assessment, score_batch, AssessmentScorer, DimensionReport, TeamScorecard,
};
