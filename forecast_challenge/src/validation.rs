//! Submission validation and the submission payload
//!
//! Every horizon entry is checked independently; any issue on any horizon
//! blocks the whole submission (no partial submission). Issues are
//! human-readable so the UI can show them next to the offending horizon.

use crate::error::{ChallengeError, Result, SubmissionIssues};
use challenge_math::intervals::IntervalEntry;
use serde::{Deserialize, Serialize};

/// Outcome of validating a full set of horizon entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionCheck {
    pub valid: bool,
    /// Issues keyed by horizon; only horizons with problems appear
    pub issues: SubmissionIssues,
}

/// Validate one horizon entry, returning its issues (empty when clean).
pub fn validate_entry(entry: &IntervalEntry) -> Vec<String> {
    let mut issues = Vec::new();

    let is_50_valid = ensure_finite(entry.lower50, "50% lower", &mut issues)
        && ensure_finite(entry.upper50, "50% upper", &mut issues);
    let is_95_valid = ensure_finite(entry.lower95, "95% lower", &mut issues)
        && ensure_finite(entry.upper95, "95% upper", &mut issues);

    if is_50_valid && entry.lower50 > entry.upper50 {
        issues.push("50% upper bound must be at least as large as the lower bound".to_string());
    }
    if is_95_valid && entry.lower95 > entry.upper95 {
        issues.push("95% upper bound must be at least as large as the lower bound".to_string());
    }
    if is_50_valid && is_95_valid {
        if entry.lower95 > entry.lower50 {
            issues.push(
                "95% lower bound must be less than or equal to the 50% lower bound".to_string(),
            );
        }
        if entry.upper95 < entry.upper50 {
            issues.push(
                "95% upper bound must be greater than or equal to the 50% upper bound".to_string(),
            );
        }
    }

    issues
}

/// Validate a complete set of entries; submission is blocked if any
/// horizon has issues.
pub fn validate_submission(entries: &[IntervalEntry]) -> SubmissionCheck {
    let mut issues = SubmissionIssues::new();
    for entry in entries {
        let entry_issues = validate_entry(entry);
        if !entry_issues.is_empty() {
            issues.insert(entry.horizon, entry_issues);
        }
    }
    SubmissionCheck {
        valid: issues.is_empty(),
        issues,
    }
}

fn ensure_finite(value: f64, label: &str, issues: &mut Vec<String>) -> bool {
    if !value.is_finite() {
        issues.push(format!("{} must be a finite number", label));
        return false;
    }
    if value < 0.0 {
        issues.push(format!("{} must be non-negative", label));
        return false;
    }
    true
}

/// One horizon of a validated submission
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayloadEntry {
    pub horizon: u32,
    pub median: f64,
    /// [lower, upper] of the 50% band
    pub interval50: [f64; 2],
    /// [lower, upper] of the 95% band
    pub interval95: [f64; 2],
}

/// An ordered, validated forecast ready for scoring and submission.
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub entries: Vec<PayloadEntry>,
}

impl SubmissionPayload {
    /// Build a payload from horizon entries, validating first. Returns
    /// [`ChallengeError::InvalidSubmission`] with the per-horizon issues
    /// when anything is off.
    pub fn from_entries(entries: &[IntervalEntry]) -> Result<Self> {
        let check = validate_submission(entries);
        if !check.valid {
            return Err(ChallengeError::InvalidSubmission(check.issues));
        }
        Ok(Self {
            entries: entries
                .iter()
                .map(|entry| PayloadEntry {
                    horizon: entry.horizon,
                    median: entry.median,
                    interval50: [entry.lower50, entry.upper50],
                    interval95: [entry.lower95, entry.upper95],
                })
                .collect(),
        })
    }

    /// The point forecasts, horizon-ordered, as scoring consumes them.
    pub fn medians(&self) -> Vec<f64> {
        self.entries.iter().map(|entry| entry.median).collect()
    }
}
