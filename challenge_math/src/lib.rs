//! # Challenge Math
//!
//! Deterministic math for the daily forecasting challenge. This crate
//! provides the pieces that must be bit-for-bit reproducible across
//! independent clients:
//!
//! - A seeded pseudo-random sequence (string hash + linear congruential
//!   generator) used to select the daily scenario
//! - The nested prediction-interval model (median, 50% and 95% bands) and
//!   its constrained edit operation
//! - Error metrics for scoring point forecasts against observed values

use thiserror::Error;

pub mod intervals;
pub mod rng;
pub mod scoring;

/// Errors that can occur in challenge-math calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for challenge-math operations
pub type Result<T> = std::result::Result<T, MathError>;
