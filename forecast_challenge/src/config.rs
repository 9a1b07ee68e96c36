//! Challenge configuration: game mechanics, datasets, and interval defaults
//!
//! Defaults mirror the production setup (three hub datasets, three daily
//! slots, a minimum of five contributing models). Everything is
//! serde-deserializable so deployments can override the table from JSON.

use crate::error::Result;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::io::Read;
use std::path::Path;

/// How much ground-truth history a scenario exposes.
///
/// Either everything since the season start (July 1) or the last N weekly
/// observations. Purely a presentation window; nothing after the issue
/// date is ever included regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryWindow {
    /// Since July 1 of the season containing the issue date
    SeasonStart,
    /// The last N weekly observations
    LastWeeks(u32),
}

impl Serialize for HistoryWindow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            HistoryWindow::SeasonStart => serializer.serialize_str("seasonStart"),
            HistoryWindow::LastWeeks(weeks) => serializer.serialize_u32(*weeks),
        }
    }
}

impl<'de> Deserialize<'de> for HistoryWindow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Weeks(u32),
            Keyword(String),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Weeks(weeks) => Ok(HistoryWindow::LastWeeks(weeks)),
            Repr::Keyword(word) if word == "seasonStart" => Ok(HistoryWindow::SeasonStart),
            Repr::Keyword(word) => Err(D::Error::custom(format!(
                "unknown history window '{}'",
                word
            ))),
        }
    }
}

/// One hub dataset the selector may draw scenarios from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Short key, e.g. "flusight"
    pub key: String,
    /// Human-readable label
    pub label: String,
    /// Directory of the processed hub files under the data root
    pub data_path: String,
    /// Per-location file suffix, e.g. "flu.json" for "MA_flu.json"
    pub file_suffix: String,
    /// Target column in the hub data, e.g. "wk inc flu hosp"
    pub target_key: String,
    /// Horizons (weeks ahead) a scenario must cover
    pub default_horizons: Vec<u32>,
    /// History window shown with the scenario
    pub history: HistoryWindow,
}

/// Game mechanics and dataset table for the daily challenge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeConfig {
    /// Namespace prefixed to every slot seed string
    pub seed_namespace: String,
    /// Number of independent challenge slots per day
    pub max_scenarios_per_day: usize,
    /// Attempt budget per dataset = min(20, locations * this)
    pub attempt_multiplier: usize,
    /// Minimum distinct contributing models for a candidate issue date
    pub min_models_required: usize,
    /// Z-score for the default 95% band (Poisson approximation)
    pub z_score_95: f64,
    /// Z-score for the default 50% band
    pub z_score_50: f64,
    /// Datasets the selector draws from
    pub datasets: Vec<DatasetConfig>,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            seed_namespace: "forecast-challenge".to_string(),
            max_scenarios_per_day: 3,
            attempt_multiplier: 2,
            min_models_required: 5,
            z_score_95: 1.96,
            z_score_50: 0.674,
            datasets: vec![
                DatasetConfig {
                    key: "flusight".to_string(),
                    label: "Influenza Hospitalizations (FluSight)".to_string(),
                    data_path: "flusight".to_string(),
                    file_suffix: "flu.json".to_string(),
                    target_key: "wk inc flu hosp".to_string(),
                    default_horizons: vec![1, 2, 3],
                    history: HistoryWindow::SeasonStart,
                },
                DatasetConfig {
                    key: "rsv".to_string(),
                    label: "RSV Hospitalizations (RSV Forecast Hub)".to_string(),
                    data_path: "rsvforecasthub".to_string(),
                    file_suffix: "rsv.json".to_string(),
                    target_key: "wk inc rsv hosp".to_string(),
                    default_horizons: vec![1, 2, 3],
                    history: HistoryWindow::SeasonStart,
                },
                DatasetConfig {
                    key: "covid19".to_string(),
                    label: "COVID-19 Hospitalizations (COVID-19 Forecast Hub)".to_string(),
                    data_path: "covid19forecasthub".to_string(),
                    file_suffix: "covid19.json".to_string(),
                    target_key: "wk inc covid hosp".to_string(),
                    default_horizons: vec![1, 2, 3],
                    history: HistoryWindow::LastWeeks(20),
                },
            ],
        }
    }
}

impl ChallengeConfig {
    /// Load a configuration from a JSON reader. Missing fields fall back
    /// to the defaults.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(file)
    }

    /// Look up a dataset by key.
    pub fn dataset(&self, key: &str) -> Option<&DatasetConfig> {
        self.datasets.iter().find(|dataset| dataset.key == key)
    }
}
