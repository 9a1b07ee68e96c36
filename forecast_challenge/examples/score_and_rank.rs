//! Score a finished forecast against hub models and print the ranking.
//!
//! Run with: cargo run --example score_and_rank

use forecast_challenge::data::{ModelForecast, QuantilePrediction};
use forecast_challenge::scoring::{rank_forecasters, score_models, score_point_forecast};
use std::collections::BTreeMap;

fn main() {
    // Observed outcomes at the three horizon dates, revealed after the
    // forecast was locked in.
    let observations = [214.0, 243.0, 239.0];
    let horizons = [1u32, 2, 3];

    // The user's point forecasts.
    let user_medians = [220.0, 235.0, 250.0];
    let user_score = score_point_forecast(&user_medians, &observations);
    println!(
        "Your RMSE: {:.2} over {}/{} horizons",
        user_score.rmse.unwrap_or(f64::NAN),
        user_score.valid_count,
        user_score.total_horizons
    );

    // Hub model forecasts, keyed by model name.
    let mut models = BTreeMap::new();
    for (name, medians) in [
        ("FluSight-ensemble", [210.0, 238.0, 245.0]),
        ("FluSight-baseline", [205.0, 205.0, 205.0]),
        ("UMass-trends", [230.0, 260.0, 290.0]),
    ] {
        let mut forecast = ModelForecast::default();
        for (index, &median) in medians.iter().enumerate() {
            forecast.insert_horizon(
                horizons[index],
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

    let model_scores = score_models(&models, &horizons, &observations);
    let ranking = rank_forecasters("You", &user_score, &model_scores, &[]);

    println!("\nLeaderboard (lower is better):");
    for (index, entry) in ranking.entries().iter().enumerate() {
        let marker = if entry.is_user { " <- you" } else { "" };
        match entry.error {
            Some(error) => println!("  #{} {:<20} {:>8.2}{}", index + 1, entry.name, error, marker),
            None => println!("  #{} {:<20} {:>8}{}", index + 1, entry.name, "-", marker),
        }
    }
    println!(
        "\nYou placed #{} of {}",
        ranking.user_rank().unwrap_or(0),
        ranking.entries().len()
    );
}
