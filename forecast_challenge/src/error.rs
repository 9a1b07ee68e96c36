//! Error types for the forecast_challenge crate

use std::collections::BTreeMap;
use thiserror::Error;

/// Per-horizon lists of human-readable submission issues
pub type SubmissionIssues = BTreeMap<u32, Vec<String>>;

/// Custom error types for the forecast_challenge crate
#[derive(Debug, Error)]
pub enum ChallengeError {
    /// Error related to provider data the caller asked for explicitly
    #[error("Data error: {0}")]
    DataError(String),

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No valid scenario could be selected for a challenge slot after the
    /// bounded number of attempts; recoverable, the day simply has no
    /// challenge in that slot
    #[error("No scenario available for {date_key} (slot {slot})")]
    ScenarioUnavailable { date_key: String, slot: usize },

    /// A submitted forecast failed validation; carries the issues per
    /// horizon so the caller can surface them and let the user keep editing
    #[error("Submission blocked: {} horizon(s) with issues", .0.len())]
    InvalidSubmission(SubmissionIssues),

    /// Submission or leaderboard transport failure
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from JSON parsing
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ChallengeError>;
