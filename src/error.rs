//! Error types for the sweep pipeline.
//!
//! Loading and evaluation are offline batch work over trusted simulation
//! output, so every variant here is fatal: the run aborts on the first
//! error rather than attempting partial recovery.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while collecting, loading, or evaluating trial records.
#[derive(Debug, Error)]
pub enum SweepError {
    /// No trial files matched the expected naming pattern.
    #[error("no trial files matching '{pattern}' found under {}", dir.display())]
    MissingData { dir: PathBuf, pattern: String },

    /// A loaded record lacks a required field.
    #[error("{}: missing required field '{field}'", path.display())]
    MissingField { path: PathBuf, field: &'static str },

    /// Estimate and target lengths disagree under the strict length policy.
    #[error("length mismatch: position estimate has {estimate} samples, target has {target}")]
    LengthMismatch { estimate: usize, target: usize },

    /// A record exists but is not valid JSON.
    #[error("failed to parse trial record: {0}")]
    Parse(#[from] serde_json::Error),

    /// Filesystem failure while reading records or writing the report.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_names_path_and_field() {
        let err = SweepError::MissingField {
            path: PathBuf::from("trial-1.json"),
            field: "pB",
        };
        let msg = err.to_string();
        assert!(msg.contains("trial-1.json"));
        assert!(msg.contains("pB"));
    }

    #[test]
    fn test_missing_data_message_names_pattern() {
        let err = SweepError::MissingData {
            dir: PathBuf::from("/data"),
            pattern: "EIH".to_string(),
        };
        assert!(err.to_string().contains("EIH"));
    }
}
