use forecast_challenge::config::ChallengeConfig;
use forecast_challenge::data::{FileDataSource, Location, ScenarioDataSource};
use std::fs;
use std::io::Write;
use tempfile::TempDir;

const METADATA_JSON: &str = r#"{
  "locations": [
    { "abbreviation": "MA", "location_name": "Massachusetts", "location": "25", "population": 6981974 },
    { "abbreviation": "CA", "location_name": "California", "location": "06" },
    { "location_name": "Unkeyed region", "location": "99" }
  ],
  "hubverse_keys": {
    "models": ["ModelA", "ModelB"],
    "targets": ["wk inc flu hosp"],
    "horizons": ["0", "1", "2", "3"],
    "output_types": ["quantile"]
  }
}"#;

const LOCATION_JSON: &str = r#"{
  "metadata": { "abbreviation": "MA", "location_name": "Massachusetts" },
  "ground_truth": {
    "dates": ["2023-10-28", "2023-11-04", "2023-11-11"],
    "wk inc flu hosp": [320.0, null, 410.0]
  },
  "forecasts": {
    "2023-11-04": {
      "wk inc flu hosp": {
        "ModelA": {
          "predictions": {
            "1": { "date": "2023-11-11", "quantiles": ["0.025", "0.25", "0.5", "0.75", "0.975"], "values": [300, 360, 400, 440, 500] },
            "2": { "quantiles": [0.025, 0.5, 0.975], "values": [280, 410, null] }
          }
        },
        "PeakOnly-Model": {
          "predictions": { "peak week": ["2023-12-30"], "probabilities": [0.4] }
        }
      }
    }
  }
}"#;

/// Lay out a hub directory the way the processed data ships: one
/// metadata.json per dataset plus per-location files.
fn hub_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let dataset_dir = dir.path().join("flusight");
    fs::create_dir_all(&dataset_dir).unwrap();
    fs::write(dataset_dir.join("metadata.json"), METADATA_JSON).unwrap();
    fs::write(dataset_dir.join("MA_flu.json"), LOCATION_JSON).unwrap();
    dir
}

fn flusight() -> forecast_challenge::config::DatasetConfig {
    ChallengeConfig::default().dataset("flusight").unwrap().clone()
}

#[test]
fn test_metadata_parses_locations_and_horizons() {
    let dir = hub_dir();
    let source = FileDataSource::new(dir.path());

    let metadata = source.dataset_metadata(&flusight()).unwrap();
    assert_eq!(metadata.locations.len(), 3);
    assert_eq!(metadata.locations[0].name, "Massachusetts");
    assert_eq!(metadata.locations[0].fips, "25");
    // Horizons arrive as strings in hub metadata.
    assert_eq!(metadata.horizons, vec![0, 1, 2, 3]);
    // The location without an abbreviation is not selectable.
    assert_eq!(metadata.selectable_locations().len(), 2);
}

#[test]
fn test_location_file_parses_leniently() {
    let dir = hub_dir();
    let source = FileDataSource::new(dir.path());
    let location = Location::new("MA", "Massachusetts", "25");

    let data = source
        .location_data(&flusight(), &location)
        .unwrap()
        .expect("MA file exists");

    // Null ground-truth values become NaN, keeping indexes aligned.
    let points = data.ground_truth.points("wk inc flu hosp");
    assert_eq!(points.len(), 3);
    assert_eq!(points[0], ("2023-10-28", 320.0));
    assert!(points[1].1.is_nan());

    let models = &data.forecasts["2023-11-04"]["wk inc flu hosp"];
    let model_a = &models["ModelA"];
    // String quantile levels parse; the median is extractable.
    assert_eq!(model_a.horizon(1).unwrap().median(), Some(400.0));
    // A null value is NaN, so the matching quantile is unusable but the
    // arrays stay parallel.
    assert_eq!(model_a.horizon(2).unwrap().quantile(0.975), None);
    assert_eq!(model_a.horizon(2).unwrap().median(), Some(410.0));
    assert_eq!(
        model_a.positive_horizons().into_iter().collect::<Vec<_>>(),
        vec![1, 2]
    );

    // Peak-week style predictions are dropped, not a parse failure.
    assert!(models["PeakOnly-Model"].predictions.is_empty());
}

#[test]
fn test_missing_location_file_is_absence_not_error() {
    let dir = hub_dir();
    let source = FileDataSource::new(dir.path());
    let location = Location::new("CA", "California", "06");

    let data = source.location_data(&flusight(), &location).unwrap();
    assert!(data.is_none());
}

#[test]
fn test_unreadable_location_file_is_absence_not_error() {
    let dir = hub_dir();
    fs::write(dir.path().join("flusight").join("CA_flu.json"), "not json").unwrap();
    let source = FileDataSource::new(dir.path());
    let location = Location::new("CA", "California", "06");

    let data = source.location_data(&flusight(), &location).unwrap();
    assert!(data.is_none());
}

#[test]
fn test_missing_metadata_is_an_error() {
    let dir = TempDir::new().unwrap();
    let source = FileDataSource::new(dir.path());
    assert!(source.dataset_metadata(&flusight()).is_err());
}

#[test]
fn test_config_loads_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{ "max_scenarios_per_day": 2, "seed_namespace": "weekend-league" }}"#
    )
    .unwrap();

    let config = ChallengeConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.max_scenarios_per_day, 2);
    assert_eq!(config.seed_namespace, "weekend-league");
    assert_eq!(config.min_models_required, 5);
}
