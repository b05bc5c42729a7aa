//! Shared error types for the scoring pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for healthmap operations.
///
/// Bad user data (a dimension missing from one assessment) is handled
/// in-band and never reaches this enum; these variants are reserved for
/// caller and configuration errors that must fail loudly.
#[derive(Debug, Error)]
pub enum HealthError {
    /// Percentile input was NaN or outside [0, 100].
    #[error("invalid percentile: {0} is not within 0..=100")]
    InvalidPercentile(f64),

    /// An outcome id was requested that no loaded definition carries.
    #[error("unknown outcome id: {0}")]
    UnknownOutcome(String),

    /// An outcome definition references a dimension key missing from the
    /// dimension registry: configuration drift, not bad assessment data.
    #[error("outcome '{outcome}' references unknown dimension key '{dimension_key}'")]
    UnknownDimension {
        outcome: String,
        dimension_key: String,
    },

    /// Configuration file or value errors.
    #[error("configuration error: {0}")]
    Config(String),

    /// Input file errors
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed input document.
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl HealthError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = HealthError::UnknownDimension {
            outcome: "predictability".to_string(),
            dimension_key: "velocity".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "outcome 'predictability' references unknown dimension key 'velocity'"
        );

        let err = HealthError::InvalidPercentile(f64::NAN);
        assert!(err.to_string().contains("invalid percentile"));
    }
}
