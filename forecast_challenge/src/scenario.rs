//! Deterministic daily scenario selection
//!
//! Each calendar day (Eastern time) every client derives the same
//! challenge scenarios from the date key alone: per slot, a seeded RNG
//! shuffles the dataset table and draws (location, issue date) candidates
//! until the validator accepts one. Candidate rejection is silent and
//! drives the retry; only exhausting every dataset surfaces as a per-slot
//! failure.

use crate::config::{ChallengeConfig, DatasetConfig, HistoryWindow};
use crate::data::{
    DatasetMetadata, GroundTruth, Location, ModelForecast, ScenarioDataSource, TargetForecasts,
};
use crate::error::{ChallengeError, Result};
use challenge_math::rng::{hash_seed, pick, shuffle_indices, SeededRng};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Identity of one daily challenge slot. The same key always resolves to
/// the same scenario given the same underlying data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioKey {
    pub challenge_date_key: String,
    pub slot_index: usize,
}

impl ScenarioKey {
    pub fn new(challenge_date_key: &str, slot_index: usize) -> Self {
        Self {
            challenge_date_key: challenge_date_key.to_string(),
            slot_index,
        }
    }

    /// The seed string this slot hashes into its RNG state.
    pub fn seed_string(&self, namespace: &str) -> String {
        format!(
            "{}-{}-{}",
            namespace, self.challenge_date_key, self.slot_index
        )
    }
}

/// One observed (date, value) pair of the ground-truth history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundTruthPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A fully-specified challenge scenario, read-only once selected.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub key: ScenarioKey,
    pub dataset_key: String,
    pub dataset_label: String,
    pub target_key: String,
    pub location: Location,
    pub issue_date: NaiveDate,
    /// Horizons (weeks ahead) the challenge asks for, sorted ascending
    pub horizons: Vec<u32>,
    /// Windowed observed history up to the issue date; never contains
    /// anything dated after it
    pub ground_truth_series: Vec<GroundTruthPoint>,
    /// Forecasts of every contributing model for the target at the issue
    /// date, in deterministic (name) order
    pub model_forecasts: BTreeMap<String, ModelForecast>,
    /// Calendar date of each horizon (issue date + 7 * horizon days)
    pub horizon_dates: Vec<NaiveDate>,
    /// Observed outcome at each horizon date, revealed after submission
    pub horizon_observations: Vec<f64>,
}

impl Scenario {
    /// The most recent observation at or before the issue date; the
    /// editing session seeds its default intervals from this.
    pub fn baseline_value(&self) -> f64 {
        self.ground_truth_series
            .last()
            .map(|point| point.value)
            .unwrap_or(0.0)
    }
}

/// The outcome of one day's generation: one result per slot, index-aligned
/// with the slot number. A failed slot is reported, never dropped.
pub type SlotResults = Vec<Result<Scenario>>;

/// Generate the day's challenge scenarios from an explicit date key.
///
/// Pure function of (date key, config, data source): re-invoking with the
/// same inputs reproduces the same scenarios, so results may be cached per
/// key. The outer error covers dataset metadata that cannot be loaded at
/// all; individual slots fail with [`ChallengeError::ScenarioUnavailable`].
pub fn generate_challenges(
    date_key: &str,
    config: &ChallengeConfig,
    source: &dyn ScenarioDataSource,
) -> Result<SlotResults> {
    let contexts: Vec<DatasetContext> = config
        .datasets
        .iter()
        .map(|dataset| {
            let metadata = source.dataset_metadata(dataset)?;
            let required = metadata.required_horizons(dataset);
            Ok(DatasetContext {
                dataset,
                metadata,
                required,
            })
        })
        .collect::<Result<_>>()?;

    let slots = (0..config.max_scenarios_per_day)
        .map(|slot_index| generate_slot(date_key, slot_index, config, source, &contexts))
        .collect();
    Ok(slots)
}

struct DatasetContext<'a> {
    dataset: &'a DatasetConfig,
    metadata: DatasetMetadata,
    required: Vec<u32>,
}

fn generate_slot(
    date_key: &str,
    slot_index: usize,
    config: &ChallengeConfig,
    source: &dyn ScenarioDataSource,
    contexts: &[DatasetContext],
) -> Result<Scenario> {
    let key = ScenarioKey::new(date_key, slot_index);
    let seed_string = key.seed_string(&config.seed_namespace);
    let mut rng = SeededRng::new(hash_seed(&seed_string));
    debug!(seed = %seed_string, "selecting scenario for slot");

    for dataset_index in shuffle_indices(contexts.len(), &mut rng) {
        let context = &contexts[dataset_index];
        if let Some(scenario) = try_dataset(&key, context, config, source, &mut rng) {
            info!(
                dataset = %scenario.dataset_key,
                location = %scenario.location.abbreviation,
                issue_date = %scenario.issue_date,
                slot = slot_index,
                "scenario selected"
            );
            return Ok(scenario);
        }
    }

    Err(ChallengeError::ScenarioUnavailable {
        date_key: date_key.to_string(),
        slot: slot_index,
    })
}

/// Bounded retry over one dataset: pick a location, load its data, pick a
/// validator-accepted issue date. `None` when the attempt budget runs out.
fn try_dataset(
    key: &ScenarioKey,
    context: &DatasetContext,
    config: &ChallengeConfig,
    source: &dyn ScenarioDataSource,
    rng: &mut SeededRng,
) -> Option<Scenario> {
    let dataset = context.dataset;
    let locations = context.metadata.selectable_locations();
    if locations.is_empty() {
        return None;
    }

    let attempt_limit = usize::min(20, locations.len() * config.attempt_multiplier);
    for _ in 0..attempt_limit {
        let location = match pick(&locations, rng) {
            Some(location) => *location,
            None => continue,
        };

        let data = match source.location_data(dataset, location) {
            Ok(Some(data)) => data,
            Ok(None) => continue,
            Err(err) => {
                warn!(
                    dataset = %dataset.key,
                    location = %location.abbreviation,
                    error = %err,
                    "skipping candidate location"
                );
                continue;
            }
        };

        let truth = truth_index(&data.ground_truth, &dataset.target_key);
        let accepted: Vec<(&String, NaiveDate)> = data
            .forecasts
            .iter()
            .filter_map(|(issue_raw, targets)| {
                validate_candidate(
                    issue_raw,
                    targets,
                    &dataset.target_key,
                    &context.required,
                    &truth,
                    config.min_models_required,
                )
                .map(|issue_date| (issue_raw, issue_date))
            })
            .collect();
        if accepted.is_empty() {
            continue;
        }

        let (issue_raw, issue_date) = match pick(&accepted, rng) {
            Some(chosen) => *chosen,
            None => continue,
        };

        let history = history_series(&truth, issue_date, dataset.history);
        if history.is_empty() {
            continue;
        }

        let targets = &data.forecasts[issue_raw];
        let model_forecasts = targets
            .get(&dataset.target_key)
            .cloned()
            .unwrap_or_default();

        let mut horizons = context.required.clone();
        horizons.sort_unstable();
        let horizon_dates: Vec<NaiveDate> = horizons
            .iter()
            .map(|&horizon| issue_date + Days::new(u64::from(horizon) * 7))
            .collect();
        let horizon_observations: Vec<f64> = horizon_dates
            .iter()
            .map(|date| truth.get(date).copied().unwrap_or(f64::NAN))
            .collect();

        return Some(Scenario {
            key: key.clone(),
            dataset_key: dataset.key.clone(),
            dataset_label: dataset.label.clone(),
            target_key: dataset.target_key.clone(),
            location: location.clone(),
            issue_date,
            horizons,
            ground_truth_series: history,
            model_forecasts,
            horizon_dates,
            horizon_observations,
        });
    }

    None
}

/// Decide whether one (issue date, forecast set) candidate is usable.
///
/// Accepts iff the target has at least `min_models` contributing models,
/// the positive horizons they cover include every required horizon, and a
/// ground-truth observation exists at issue date + 7 * h days for each
/// required horizon. Returns the parsed issue date on acceptance.
pub fn validate_candidate(
    issue_raw: &str,
    targets: &TargetForecasts,
    target_key: &str,
    required_horizons: &[u32],
    truth: &BTreeMap<NaiveDate, f64>,
    min_models: usize,
) -> Option<NaiveDate> {
    let issue_date = NaiveDate::parse_from_str(issue_raw, "%Y-%m-%d").ok()?;
    let models = targets.get(target_key)?;

    let contributing = models
        .values()
        .filter(|forecast| !forecast.predictions.is_empty())
        .count();
    if contributing < min_models {
        return None;
    }

    let covered: BTreeSet<u32> = models
        .values()
        .flat_map(ModelForecast::positive_horizons)
        .collect();
    if !required_horizons
        .iter()
        .all(|horizon| covered.contains(horizon))
    {
        return None;
    }

    let resolved = required_horizons.iter().all(|&horizon| {
        truth.contains_key(&(issue_date + Days::new(u64::from(horizon) * 7)))
    });
    if !resolved {
        return None;
    }

    Some(issue_date)
}

/// Index the observed series by parsed date, keeping finite values only.
/// Later entries win on duplicate dates.
pub fn truth_index(ground_truth: &GroundTruth, target_key: &str) -> BTreeMap<NaiveDate, f64> {
    let mut index = BTreeMap::new();
    for (raw_date, value) in ground_truth.points(target_key) {
        if !value.is_finite() {
            continue;
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d") {
            index.insert(date, value);
        }
    }
    index
}

/// July 1 of the season containing the given date.
pub fn season_start(date: NaiveDate) -> NaiveDate {
    let year = if date.month() >= 7 {
        date.year()
    } else {
        date.year() - 1
    };
    NaiveDate::from_ymd_opt(year, 7, 1).unwrap()
}

/// The windowed history shown with a scenario: observations at or before
/// the issue date, then restricted to the configured window.
fn history_series(
    truth: &BTreeMap<NaiveDate, f64>,
    issue_date: NaiveDate,
    window: HistoryWindow,
) -> Vec<GroundTruthPoint> {
    let history: Vec<GroundTruthPoint> = truth
        .range(..=issue_date)
        .map(|(&date, &value)| GroundTruthPoint { date, value })
        .collect();

    match window {
        HistoryWindow::SeasonStart => {
            let start = season_start(issue_date);
            history
                .into_iter()
                .filter(|point| point.date >= start)
                .collect()
        }
        HistoryWindow::LastWeeks(weeks) => {
            let keep = weeks as usize;
            if history.len() > keep {
                history[history.len() - keep..].to_vec()
            } else {
                history
            }
        }
    }
}
