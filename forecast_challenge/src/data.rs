//! Hub data model and scenario data sources
//!
//! The processed hub files are JSON: one `metadata.json` per dataset
//! (locations plus the hubverse keys actually present) and one file per
//! location keyed issue date -> target -> model -> predictions, with a
//! ground-truth series alongside. Quantile levels arrive as strings in
//! some hubs and numbers in others, and values may be null, so the
//! deserializers here are deliberately lenient: anything unusable becomes
//! NaN and is skipped downstream, never a parse failure.

use crate::config::DatasetConfig;
use crate::error::{ChallengeError, Result};
use challenge_math::scoring::{median_from_quantiles, quantile_value, QUANTILE_TOLERANCE};
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::warn;

/// One forecastable location within a dataset
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Location {
    /// Two-letter abbreviation used in file names, e.g. "MA"
    #[serde(default)]
    pub abbreviation: String,
    /// Display name, e.g. "Massachusetts"
    #[serde(default, rename = "location_name")]
    pub name: String,
    /// FIPS code as it appears in hub data
    #[serde(default, rename = "location")]
    pub fips: String,
}

impl Location {
    pub fn new(abbreviation: &str, name: &str, fips: &str) -> Self {
        Self {
            abbreviation: abbreviation.to_string(),
            name: name.to_string(),
            fips: fips.to_string(),
        }
    }
}

/// Dataset-level metadata: the locations and the horizons the hub
/// actually publishes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetMetadata {
    pub locations: Vec<Location>,
    pub horizons: Vec<i64>,
}

impl DatasetMetadata {
    /// Locations usable for selection (non-empty abbreviation).
    pub fn selectable_locations(&self) -> Vec<&Location> {
        self.locations
            .iter()
            .filter(|location| !location.abbreviation.is_empty())
            .collect()
    }

    /// The dataset's configured horizons restricted to what the hub
    /// advertises; falls back to the configured list when the
    /// intersection is empty.
    pub fn required_horizons(&self, dataset: &DatasetConfig) -> Vec<u32> {
        let advertised: BTreeSet<i64> = self.horizons.iter().copied().collect();
        let required: Vec<u32> = dataset
            .default_horizons
            .iter()
            .copied()
            .filter(|&horizon| advertised.contains(&i64::from(horizon)))
            .collect();
        if required.is_empty() {
            dataset.default_horizons.clone()
        } else {
            required
        }
    }
}

impl<'de> Deserialize<'de> for DatasetMetadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct RawHubverseKeys {
            #[serde(default)]
            horizons: Vec<serde_json::Value>,
        }
        #[derive(Deserialize)]
        struct RawMetadata {
            #[serde(default)]
            locations: Vec<Location>,
            #[serde(default)]
            hubverse_keys: Option<RawHubverseKeys>,
        }

        let raw = RawMetadata::deserialize(deserializer)?;
        let horizons = raw
            .hubverse_keys
            .map(|keys| {
                keys.horizons
                    .iter()
                    .filter_map(value_as_i64)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Ok(Self {
            locations: raw.locations,
            horizons,
        })
    }
}

/// One model's predictions for a single horizon: parallel quantile
/// level/value arrays
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuantilePrediction {
    #[serde(default, deserialize_with = "lenient_f64_vec")]
    pub quantiles: Vec<f64>,
    #[serde(default, deserialize_with = "lenient_f64_vec")]
    pub values: Vec<f64>,
}

impl QuantilePrediction {
    pub fn new(quantiles: Vec<f64>, values: Vec<f64>) -> Self {
        Self { quantiles, values }
    }

    /// Value at the given quantile level, if present and finite.
    pub fn quantile(&self, level: f64) -> Option<f64> {
        quantile_value(&self.quantiles, &self.values, level, QUANTILE_TOLERANCE)
    }

    /// The median (quantile 0.5), if present and finite.
    pub fn median(&self) -> Option<f64> {
        median_from_quantiles(&self.quantiles, &self.values)
    }
}

/// One model's predictions across horizons, keyed by the horizon as it
/// appears in the hub file (a string)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModelForecast {
    #[serde(default, deserialize_with = "lenient_predictions")]
    pub predictions: BTreeMap<String, QuantilePrediction>,
}

impl ModelForecast {
    /// Prediction for a specific horizon.
    pub fn horizon(&self, horizon: u32) -> Option<&QuantilePrediction> {
        self.predictions.get(&horizon.to_string())
    }

    /// Insert a prediction under its horizon key.
    pub fn insert_horizon(&mut self, horizon: u32, prediction: QuantilePrediction) {
        self.predictions.insert(horizon.to_string(), prediction);
    }

    /// Horizon keys that parse as positive integers.
    pub fn positive_horizons(&self) -> BTreeSet<u32> {
        self.predictions
            .keys()
            .filter_map(|key| key.parse::<u32>().ok())
            .filter(|&horizon| horizon > 0)
            .collect()
    }
}

/// All models' forecasts at one issue date, keyed target -> model
pub type TargetForecasts = BTreeMap<String, BTreeMap<String, ModelForecast>>;

/// Observed series per target, with dates and values as parallel arrays
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroundTruth {
    pub dates: Vec<String>,
    pub targets: BTreeMap<String, Vec<f64>>,
}

impl GroundTruth {
    /// (date, value) pairs for a target; missing values come back as NaN
    /// so indexes stay aligned with `dates`.
    pub fn points(&self, target: &str) -> Vec<(&str, f64)> {
        let values = match self.targets.get(target) {
            Some(values) => values,
            None => return Vec::new(),
        };
        self.dates
            .iter()
            .zip(values.iter())
            .map(|(date, &value)| (date.as_str(), value))
            .collect()
    }
}

impl<'de> Deserialize<'de> for GroundTruth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct RawGroundTruth {
            #[serde(default)]
            dates: Vec<String>,
            #[serde(flatten)]
            rest: BTreeMap<String, serde_json::Value>,
        }

        let raw = RawGroundTruth::deserialize(deserializer)?;
        let mut targets = BTreeMap::new();
        for (target, value) in raw.rest {
            if let serde_json::Value::Array(items) = value {
                let values: Vec<f64> = items
                    .iter()
                    .map(|item| value_as_f64(item).unwrap_or(f64::NAN))
                    .collect();
                targets.insert(target, values);
            }
        }
        Ok(Self {
            dates: raw.dates,
            targets,
        })
    }
}

/// Everything the hub publishes for one (dataset, location) pair
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LocationData {
    /// Issue date -> target -> model -> forecast
    #[serde(default)]
    pub forecasts: BTreeMap<String, TargetForecasts>,
    #[serde(default)]
    pub ground_truth: GroundTruth,
}

/// Provider of hub data for the scenario selector.
///
/// Absence of a location file is `Ok(None)`, meaning "no data for this
/// candidate", never an error; the selector treats it as a silent skip.
pub trait ScenarioDataSource {
    fn dataset_metadata(&self, dataset: &DatasetConfig) -> Result<DatasetMetadata>;

    fn location_data(
        &self,
        dataset: &DatasetConfig,
        location: &Location,
    ) -> Result<Option<LocationData>>;
}

/// Data source reading processed hub files from a local directory tree:
/// `{root}/{data_path}/metadata.json` and
/// `{root}/{data_path}/{ABBR}_{file_suffix}`.
#[derive(Debug, Clone)]
pub struct FileDataSource {
    root: PathBuf,
}

impl FileDataSource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl ScenarioDataSource for FileDataSource {
    fn dataset_metadata(&self, dataset: &DatasetConfig) -> Result<DatasetMetadata> {
        let path = self.root.join(&dataset.data_path).join("metadata.json");
        let file = std::fs::File::open(&path).map_err(|err| {
            ChallengeError::DataError(format!(
                "cannot open metadata for dataset '{}' at {}: {}",
                dataset.key,
                path.display(),
                err
            ))
        })?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    fn location_data(
        &self,
        dataset: &DatasetConfig,
        location: &Location,
    ) -> Result<Option<LocationData>> {
        let file_name = format!("{}_{}", location.abbreviation, dataset.file_suffix);
        let path = self.root.join(&dataset.data_path).join(&file_name);
        let file = match std::fs::File::open(&path) {
            Ok(file) => file,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "location data unavailable");
                return Ok(None);
            }
        };
        match serde_json::from_reader(std::io::BufReader::new(file)) {
            Ok(data) => Ok(Some(data)),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "location data unreadable");
                Ok(None)
            }
        }
    }
}

/// In-memory data source for tests and fixtures.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataSource {
    metadata: BTreeMap<String, DatasetMetadata>,
    locations: BTreeMap<(String, String), LocationData>,
}

impl MemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_metadata(&mut self, dataset_key: &str, metadata: DatasetMetadata) {
        self.metadata.insert(dataset_key.to_string(), metadata);
    }

    pub fn insert_location_data(
        &mut self,
        dataset_key: &str,
        abbreviation: &str,
        data: LocationData,
    ) {
        self.locations
            .insert((dataset_key.to_string(), abbreviation.to_string()), data);
    }
}

impl ScenarioDataSource for MemoryDataSource {
    fn dataset_metadata(&self, dataset: &DatasetConfig) -> Result<DatasetMetadata> {
        self.metadata.get(&dataset.key).cloned().ok_or_else(|| {
            ChallengeError::DataError(format!("no metadata for dataset '{}'", dataset.key))
        })
    }

    fn location_data(
        &self,
        dataset: &DatasetConfig,
        location: &Location,
    ) -> Result<Option<LocationData>> {
        let key = (dataset.key.clone(), location.abbreviation.clone());
        Ok(self.locations.get(&key).cloned())
    }
}

fn value_as_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.parse::<f64>().ok(),
        _ => None,
    }
}

fn value_as_i64(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(number) => number.as_i64(),
        serde_json::Value::String(text) => text.parse::<i64>().ok(),
        _ => None,
    }
}

/// Accept numbers, numeric strings, and nulls; anything unusable becomes
/// NaN so the parallel arrays keep their indexes.
fn lenient_f64_vec<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<f64>, D::Error> {
    let raw: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    Ok(raw
        .iter()
        .map(|value| value_as_f64(value).unwrap_or(f64::NAN))
        .collect())
}

/// Keep only the horizon entries that look like quantile predictions;
/// hubs mix other output types (e.g. peak-week categories) into the same
/// map and those are not usable here.
fn lenient_predictions<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, QuantilePrediction>, D::Error> {
    let raw: BTreeMap<String, serde_json::Value> = BTreeMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter(|(_, value)| value.is_object())
        .filter_map(|(key, value)| {
            serde_json::from_value::<QuantilePrediction>(value)
                .ok()
                .map(|prediction| (key, prediction))
        })
        .collect())
}
