//! Generate a day's challenge from an in-memory fixture and play one slot.
//!
//! Run with: cargo run --example daily_challenge

use forecast_challenge::challenge::DailyChallenge;
use forecast_challenge::clock::FixedClock;
use forecast_challenge::config::{ChallengeConfig, DatasetConfig, HistoryWindow};
use forecast_challenge::data::{
    DatasetMetadata, GroundTruth, Location, LocationData, MemoryDataSource, ModelForecast,
    QuantilePrediction,
};
use forecast_challenge::session::{EditIntent, ForecastSession, Handle};
use std::collections::BTreeMap;

const TARGET: &str = "wk inc flu hosp";

fn demo_source() -> MemoryDataSource {
    let mut source = MemoryDataSource::new();
    source.insert_metadata(
        "flusight",
        DatasetMetadata {
            locations: vec![
                Location::new("MA", "Massachusetts", "25"),
                Location::new("CA", "California", "06"),
                Location::new("TX", "Texas", "48"),
            ],
            horizons: vec![0, 1, 2, 3],
        },
    );

    let start = chrono::NaiveDate::from_ymd_opt(2023, 9, 2).unwrap();
    let dates: Vec<String> = (0..15)
        .map(|week| (start + chrono::Days::new(week * 7)).format("%Y-%m-%d").to_string())
        .collect();

    for (abbr, base) in [("MA", 120.0), ("CA", 340.0), ("TX", 210.0)] {
        let values: Vec<f64> = (0..15).map(|week| base + 12.0 * week as f64).collect();
        let mut models = BTreeMap::new();
        for (name, offset) in [
            ("FluSight-ensemble", 0.0),
            ("FluSight-baseline", -15.0),
            ("UMass-trends", 20.0),
            ("CMU-timeseries", -30.0),
            ("ISU-nowcast", 45.0),
        ] {
            let mut forecast = ModelForecast::default();
            for horizon in 1..=3u32 {
                let median = base + 110.0 + offset + 10.0 * horizon as f64;
                forecast.insert_horizon(
                    horizon,
                    QuantilePrediction::new(
                        vec![0.025, 0.25, 0.5, 0.75, 0.975],
                        vec![
                            median - 60.0,
                            median - 25.0,
                            median,
                            median + 25.0,
                            median + 60.0,
                        ],
                    ),
                );
            }
            models.insert(name.to_string(), forecast);
        }

        let mut forecasts = BTreeMap::new();
        for issue in ["2023-11-04", "2023-11-11"] {
            forecasts.insert(
                issue.to_string(),
                BTreeMap::from([(TARGET.to_string(), models.clone())]),
            );
        }

        source.insert_location_data(
            "flusight",
            abbr,
            LocationData {
                forecasts,
                ground_truth: GroundTruth {
                    dates: dates.clone(),
                    targets: BTreeMap::from([(TARGET.to_string(), values)]),
                },
            },
        );
    }

    source
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ChallengeConfig {
        datasets: vec![DatasetConfig {
            key: "flusight".to_string(),
            label: "Influenza Hospitalizations (FluSight)".to_string(),
            data_path: "flusight".to_string(),
            file_suffix: "flu.json".to_string(),
            target_key: TARGET.to_string(),
            default_horizons: vec![1, 2, 3],
            history: HistoryWindow::LastWeeks(8),
        }],
        ..ChallengeConfig::default()
    };
    let source = demo_source();
    let clock = FixedClock("2024-01-15".to_string());

    let daily = DailyChallenge::generate(&clock, &config, &source)?;
    println!("Challenge date: {}", daily.date_key);

    for slot in &daily.slots {
        match slot {
            Ok(scenario) => {
                println!(
                    "Slot {}: {} — {} as of {}",
                    scenario.key.slot_index,
                    scenario.dataset_label,
                    scenario.location.name,
                    scenario.issue_date
                );
                println!(
                    "  history: {} weeks, latest observation {}",
                    scenario.ground_truth_series.len(),
                    scenario.baseline_value()
                );
            }
            Err(err) => println!("Slot unavailable: {}", err),
        }
    }

    // Play the first available slot: nudge the medians upward, then
    // freeze a validated payload.
    let scenario = daily.available().next().ok_or("no challenge available")?;
    let mut session = ForecastSession::new(scenario, &config);
    for &horizon in &scenario.horizons {
        session.apply(EditIntent {
            horizon,
            handle: Handle::Median,
            value: session.baseline() + 15.0 * horizon as f64,
        });
    }

    let payload = session.submission_payload()?;
    println!("\nSubmitted forecast:");
    for entry in &payload.entries {
        println!(
            "  {}w ahead: median {:.0}, 50% [{:.0}, {:.0}], 95% [{:.0}, {:.0}]",
            entry.horizon,
            entry.median,
            entry.interval50[0],
            entry.interval50[1],
            entry.interval95[0],
            entry.interval95[1]
        );
    }

    Ok(())
}
