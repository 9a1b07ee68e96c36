//! Submission and leaderboard seams
//!
//! The engine never talks to a backend directly; it hands a finished
//! payload to a [`SubmissionTransport`] and reads other participants'
//! stored submissions from a [`LeaderboardProvider`]. Transport failures
//! surface as distinct errors and are never silently dropped; retrying is
//! the transport's own business.

use crate::error::Result;
use crate::validation::SubmissionPayload;
use serde::{Deserialize, Serialize};

/// A participant's finished forecast for one challenge slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeSubmission {
    pub date_key: String,
    pub slot_index: usize,
    pub participant: String,
    pub payload: SubmissionPayload,
}

/// Accepts finished submissions.
pub trait SubmissionTransport {
    fn submit(&mut self, submission: &ChallengeSubmission) -> Result<()>;
}

/// Reads other participants' stored submissions for ranking.
pub trait LeaderboardProvider {
    fn entries(&self, date_key: &str, slot_index: usize) -> Result<Vec<ChallengeSubmission>>;
}

/// In-memory transport + leaderboard, for tests and offline play.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    submissions: Vec<ChallengeSubmission>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> &[ChallengeSubmission] {
        &self.submissions
    }
}

impl SubmissionTransport for MemoryTransport {
    fn submit(&mut self, submission: &ChallengeSubmission) -> Result<()> {
        self.submissions.push(submission.clone());
        Ok(())
    }
}

impl LeaderboardProvider for MemoryTransport {
    fn entries(&self, date_key: &str, slot_index: usize) -> Result<Vec<ChallengeSubmission>> {
        Ok(self
            .submissions
            .iter()
            .filter(|submission| {
                submission.date_key == date_key && submission.slot_index == slot_index
            })
            .cloned()
            .collect())
    }
}
