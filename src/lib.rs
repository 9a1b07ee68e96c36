//! Workspace facade for the daily forecasting challenge.
//!
//! The engine lives in two member crates:
//!
//! - `challenge_math`: deterministic RNG, nested prediction intervals,
//!   error metrics
//! - `forecast_challenge`: scenario selection, editing sessions,
//!   submission validation, scoring and ranking
//!
//! ## Example
//!
//! ```
//! use challenge_math::rng::SeededRng;
//!
//! let mut a = SeededRng::from_seed_str("forecast-challenge-2024-01-15-0");
//! let mut b = SeededRng::from_seed_str("forecast-challenge-2024-01-15-0");
//! assert_eq!(a.next_f64(), b.next_f64());
//! ```

pub use challenge_math;
pub use forecast_challenge;
