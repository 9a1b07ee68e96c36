use chrono::NaiveDate;
use forecast_challenge::config::{ChallengeConfig, DatasetConfig, HistoryWindow};
use forecast_challenge::data::{
    DatasetMetadata, GroundTruth, Location, LocationData, MemoryDataSource, ModelForecast,
    QuantilePrediction,
};
use forecast_challenge::error::ChallengeError;
use forecast_challenge::scenario::{generate_challenges, truth_index, validate_candidate};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

const TARGET: &str = "wk inc flu hosp";

fn test_dataset() -> DatasetConfig {
    DatasetConfig {
        key: "flusight".to_string(),
        label: "Influenza Hospitalizations (FluSight)".to_string(),
        data_path: "flusight".to_string(),
        file_suffix: "flu.json".to_string(),
        target_key: TARGET.to_string(),
        default_horizons: vec![1, 2, 3],
        history: HistoryWindow::LastWeeks(26),
    }
}

fn test_config() -> ChallengeConfig {
    ChallengeConfig {
        min_models_required: 3,
        datasets: vec![test_dataset()],
        ..ChallengeConfig::default()
    }
}

fn prediction(median: f64) -> QuantilePrediction {
    QuantilePrediction::new(
        vec![0.025, 0.25, 0.5, 0.75, 0.975],
        vec![
            median * 0.5,
            median * 0.8,
            median,
            median * 1.2,
            median * 1.5,
        ],
    )
}

fn model(horizons: &[u32], median: f64) -> ModelForecast {
    let mut forecast = ModelForecast::default();
    for &horizon in horizons {
        forecast.insert_horizon(horizon, prediction(median));
    }
    forecast
}

/// Weekly Saturdays 2023-09-02 .. 2023-12-09 with steadily rising counts.
fn weekly_truth() -> GroundTruth {
    let start = NaiveDate::from_ymd_opt(2023, 9, 2).unwrap();
    let dates: Vec<String> = (0..15)
        .map(|week| (start + chrono::Days::new(week * 7)).format("%Y-%m-%d").to_string())
        .collect();
    let values: Vec<f64> = (0..15).map(|week| 100.0 + 10.0 * week as f64).collect();
    GroundTruth {
        dates,
        targets: BTreeMap::from([(TARGET.to_string(), values)]),
    }
}

fn location_data(model_medians: &[(&str, f64)], issue_dates: &[&str]) -> LocationData {
    let mut forecasts = BTreeMap::new();
    for &issue in issue_dates {
        let models: BTreeMap<String, ModelForecast> = model_medians
            .iter()
            .map(|&(name, median)| (name.to_string(), model(&[1, 2, 3], median)))
            .collect();
        forecasts.insert(
            issue.to_string(),
            BTreeMap::from([(TARGET.to_string(), models)]),
        );
    }
    LocationData {
        forecasts,
        ground_truth: weekly_truth(),
    }
}

fn test_source() -> MemoryDataSource {
    let mut source = MemoryDataSource::new();
    source.insert_metadata(
        "flusight",
        DatasetMetadata {
            locations: vec![
                Location::new("MA", "Massachusetts", "25"),
                Location::new("CA", "California", "06"),
            ],
            horizons: vec![0, 1, 2, 3],
        },
    );
    let models = [("ModelA", 140.0), ("ModelB", 150.0), ("ModelC", 165.0)];
    // Both issue dates leave three weeks of resolved ground truth after them.
    source.insert_location_data("flusight", "MA", location_data(&models, &["2023-11-04", "2023-11-11"]));
    source.insert_location_data("flusight", "CA", location_data(&models, &["2023-11-04", "2023-11-11"]));
    source
}

#[test]
fn test_generation_is_deterministic() {
    let config = test_config();
    let source = test_source();

    let first = generate_challenges("2024-01-15", &config, &source).unwrap();
    let second = generate_challenges("2024-01-15", &config, &source).unwrap();

    assert_eq!(first.len(), config.max_scenarios_per_day);
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        let a = a.as_ref().expect("fixture always yields a scenario");
        let b = b.as_ref().expect("fixture always yields a scenario");
        assert_eq!(a, b);
    }
}

#[test]
fn test_regeneration_has_no_hidden_state() {
    // Generating other days in between must not change what a key yields.
    let config = test_config();
    let source = test_source();

    let before = generate_challenges("2024-01-15", &config, &source).unwrap();
    let _ = generate_challenges("2024-01-16", &config, &source).unwrap();
    let _ = generate_challenges("2024-02-29", &config, &source).unwrap();
    let after = generate_challenges("2024-01-15", &config, &source).unwrap();

    for (a, b) in before.iter().zip(after.iter()) {
        assert_eq!(a.as_ref().unwrap(), b.as_ref().unwrap());
    }
}

#[test]
fn test_slots_are_independent_draws() {
    let config = test_config();
    let source = test_source();

    let slots = generate_challenges("2024-01-15", &config, &source).unwrap();
    let keys: Vec<_> = slots
        .iter()
        .map(|slot| slot.as_ref().unwrap().key.clone())
        .collect();
    for (index, key) in keys.iter().enumerate() {
        assert_eq!(key.slot_index, index);
        assert_eq!(key.challenge_date_key, "2024-01-15");
    }
}

#[test]
fn test_scenario_never_peeks_past_issue_date() {
    let config = test_config();
    let source = test_source();

    for slot in generate_challenges("2024-01-15", &config, &source).unwrap() {
        let scenario = slot.unwrap();
        for point in &scenario.ground_truth_series {
            assert!(point.date <= scenario.issue_date);
        }
        // The revealed outcomes are strictly after the issue date.
        for date in &scenario.horizon_dates {
            assert!(*date > scenario.issue_date);
        }
        assert_eq!(scenario.horizons, vec![1, 2, 3]);
        assert_eq!(scenario.model_forecasts.len(), 3);
        assert!(scenario.baseline_value() > 0.0);
    }
}

#[test]
fn test_exhaustion_reports_every_slot() {
    let config = test_config();
    let mut source = MemoryDataSource::new();
    source.insert_metadata(
        "flusight",
        DatasetMetadata {
            locations: vec![Location::new("MA", "Massachusetts", "25")],
            horizons: vec![1, 2, 3],
        },
    );
    // Only two contributing models; the minimum is three.
    source.insert_location_data(
        "flusight",
        "MA",
        location_data(&[("ModelA", 140.0), ("ModelB", 150.0)], &["2023-11-04"]),
    );

    let slots = generate_challenges("2024-01-15", &config, &source).unwrap();
    assert_eq!(slots.len(), config.max_scenarios_per_day);
    for (index, slot) in slots.iter().enumerate() {
        match slot {
            Err(ChallengeError::ScenarioUnavailable { date_key, slot }) => {
                assert_eq!(date_key, "2024-01-15");
                assert_eq!(*slot, index);
            }
            other => panic!("expected ScenarioUnavailable, got {:?}", other),
        }
    }
}

#[test]
fn test_missing_metadata_is_an_error() {
    let config = test_config();
    let source = MemoryDataSource::new();
    assert!(generate_challenges("2024-01-15", &config, &source).is_err());
}

#[test]
fn test_validator_requires_minimum_models() {
    let data = location_data(
        &[
            ("ModelA", 140.0),
            ("ModelB", 150.0),
            ("ModelC", 160.0),
            ("ModelD", 170.0),
        ],
        &["2023-11-04"],
    );
    let truth = truth_index(&data.ground_truth, TARGET);
    let targets = &data.forecasts["2023-11-04"];

    // Four contributing models is not enough when five are required.
    assert_eq!(
        validate_candidate("2023-11-04", targets, TARGET, &[1, 2, 3], &truth, 5),
        None
    );
    assert_eq!(
        validate_candidate("2023-11-04", targets, TARGET, &[1, 2, 3], &truth, 4),
        Some(NaiveDate::from_ymd_opt(2023, 11, 4).unwrap())
    );
}

#[test]
fn test_validator_requires_every_horizon_resolved() {
    let mut data = location_data(&[("ModelA", 140.0), ("ModelB", 150.0)], &["2023-11-04"]);
    // Drop the observation three weeks out (2023-11-25).
    let values = data.ground_truth.targets.get_mut(TARGET).unwrap();
    values[12] = f64::NAN;
    let truth = truth_index(&data.ground_truth, TARGET);
    let targets = &data.forecasts["2023-11-04"];

    assert_eq!(
        validate_candidate("2023-11-04", targets, TARGET, &[1, 2, 3], &truth, 2),
        None
    );
    // Horizons 1 and 2 alone still resolve.
    assert!(validate_candidate("2023-11-04", targets, TARGET, &[1, 2], &truth, 2).is_some());
}

#[test]
fn test_validator_requires_forecast_horizons() {
    let mut data = location_data(&[("ModelA", 140.0), ("ModelB", 150.0)], &["2023-11-04"]);
    // Strip horizon 3 from every model.
    for targets in data.forecasts.values_mut() {
        for model in targets.get_mut(TARGET).unwrap().values_mut() {
            model.predictions.remove("3");
        }
    }
    let truth = truth_index(&data.ground_truth, TARGET);
    let targets = &data.forecasts["2023-11-04"];

    assert_eq!(
        validate_candidate("2023-11-04", targets, TARGET, &[1, 2, 3], &truth, 2),
        None
    );
}

#[test]
fn test_validator_rejects_unparseable_issue_date() {
    let data = location_data(&[("ModelA", 140.0), ("ModelB", 150.0)], &["2023-11-04"]);
    let truth = truth_index(&data.ground_truth, TARGET);
    let targets = &data.forecasts["2023-11-04"];

    assert_eq!(
        validate_candidate("not-a-date", targets, TARGET, &[1], &truth, 1),
        None
    );
}

#[test]
fn test_history_window_last_weeks() {
    let mut config = test_config();
    config.datasets[0].history = HistoryWindow::LastWeeks(4);
    let source = test_source();

    for slot in generate_challenges("2024-01-15", &config, &source).unwrap() {
        let scenario = slot.unwrap();
        assert!(scenario.ground_truth_series.len() <= 4);
    }
}

#[test]
fn test_history_window_season_start() {
    let mut config = test_config();
    config.datasets[0].history = HistoryWindow::SeasonStart;
    let source = test_source();

    for slot in generate_challenges("2024-01-15", &config, &source).unwrap() {
        let scenario = slot.unwrap();
        let season_start = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();
        for point in &scenario.ground_truth_series {
            assert!(point.date >= season_start);
        }
    }
}

#[test]
fn test_truth_index_drops_non_finite_and_dedups() {
    let truth = GroundTruth {
        dates: vec![
            "2023-09-02".to_string(),
            "2023-09-02".to_string(),
            "2023-09-09".to_string(),
            "bad-date".to_string(),
        ],
        targets: BTreeMap::from([(
            TARGET.to_string(),
            vec![100.0, 120.0, f64::NAN, 140.0],
        )]),
    };
    let index = truth_index(&truth, TARGET);
    // Later duplicate wins, NaN and unparseable dates are dropped.
    assert_eq!(index.len(), 1);
    assert_eq!(
        index[&NaiveDate::from_ymd_opt(2023, 9, 2).unwrap()],
        120.0
    );
}
