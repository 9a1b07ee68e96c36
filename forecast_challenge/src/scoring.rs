//! Scoring submitted forecasts and ranking forecasters
//!
//! The metric is RMSE between point forecasts (medians) and the observed
//! outcomes at each horizon date. Models are scored from the median
//! quantile of their stored predictions; a model with no usable pair is
//! excluded from the ranking rather than carried with a null score.

use crate::data::ModelForecast;
use crate::validation::SubmissionPayload;
use challenge_math::scoring::{rmse, valid_pair_count};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Score of a single forecaster against the observed outcomes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Root mean squared error over the valid pairs; `None` when no pair
    /// was scoreable
    pub rmse: Option<f64>,
    /// Number of horizon pairs that entered the mean
    pub valid_count: usize,
    /// Number of horizons the forecast covered
    pub total_horizons: usize,
}

/// Score a point forecast (one median per horizon) against observations.
pub fn score_point_forecast(medians: &[f64], observations: &[f64]) -> ScoreResult {
    let valid_count = if medians.len() == observations.len() {
        valid_pair_count(medians, observations)
    } else {
        0
    };
    ScoreResult {
        rmse: rmse(medians, observations),
        valid_count,
        total_horizons: medians.len(),
    }
}

/// Score a validated submission against observations.
pub fn score_submission(payload: &SubmissionPayload, observations: &[f64]) -> ScoreResult {
    score_point_forecast(&payload.medians(), observations)
}

/// One model's score, in discovery order
#[derive(Debug, Clone, PartialEq)]
pub struct ModelScore {
    pub name: String,
    pub score: ScoreResult,
}

/// Score every model that has a usable median for at least one horizon.
///
/// A horizon where the model lacks a median becomes a skipped pair; a
/// model with zero valid pairs is dropped entirely so it cannot distort
/// the ranking.
pub fn score_models(
    models: &BTreeMap<String, ModelForecast>,
    horizons: &[u32],
    observations: &[f64],
) -> Vec<ModelScore> {
    models
        .iter()
        .filter_map(|(name, forecast)| {
            let medians: Vec<f64> = horizons
                .iter()
                .map(|&horizon| {
                    forecast
                        .horizon(horizon)
                        .and_then(|prediction| prediction.median())
                        .unwrap_or(f64::NAN)
                })
                .collect();
            let score = score_point_forecast(&medians, observations);
            score.rmse.map(|_| ModelScore {
                name: name.clone(),
                score,
            })
        })
        .collect()
}

/// One row of the final ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    /// Lower is better; `None` sorts last
    pub error: Option<f64>,
    pub is_user: bool,
}

impl RankingEntry {
    pub fn user(name: &str, error: Option<f64>) -> Self {
        Self {
            name: name.to_string(),
            error,
            is_user: true,
        }
    }

    pub fn forecaster(name: &str, error: Option<f64>) -> Self {
        Self {
            name: name.to_string(),
            error,
            is_user: false,
        }
    }
}

/// All forecasters ordered best-first: user, hub models, and other
/// participants merged, then stable-sorted ascending by error.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    entries: Vec<RankingEntry>,
}

impl Ranking {
    /// Merge and sort. The sort is stable, so ties and missing errors
    /// keep their discovery order: user first, then models, then
    /// participants.
    pub fn build(
        user: RankingEntry,
        models: Vec<RankingEntry>,
        participants: Vec<RankingEntry>,
    ) -> Self {
        let mut entries = Vec::with_capacity(1 + models.len() + participants.len());
        entries.push(user);
        entries.extend(models);
        entries.extend(participants);
        entries.sort_by(|a, b| compare_errors(a.error, b.error));
        Self { entries }
    }

    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }

    /// The user's 1-based rank, computed only after every entry has been
    /// merged in.
    pub fn user_rank(&self) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.is_user)
            .map(|index| index + 1)
    }
}

fn compare_errors(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(left), Some(right)) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Convenience: build the full ranking from scores.
pub fn rank_forecasters(
    user_name: &str,
    user_score: &ScoreResult,
    model_scores: &[ModelScore],
    participant_scores: &[(String, ScoreResult)],
) -> Ranking {
    let user = RankingEntry::user(user_name, user_score.rmse);
    let models = model_scores
        .iter()
        .map(|model| RankingEntry::forecaster(&model.name, model.score.rmse))
        .collect();
    let participants = participant_scores
        .iter()
        .map(|(name, score)| RankingEntry::forecaster(name, score.rmse))
        .collect();
    Ranking::build(user, models, participants)
}
