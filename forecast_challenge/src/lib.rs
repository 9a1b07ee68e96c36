//! # Forecast Challenge
//!
//! A Rust library for daily forecasting challenges against epidemiological
//! forecast hubs.
//!
//! ## Features
//!
//! - Deterministic daily scenario selection: every visitor sees the same
//!   (dataset, location, issue date) on a given calendar day, with no
//!   shared server state
//! - Candidate validation (contributing models, required horizons, ground
//!   truth available at every horizon date)
//! - A constrained nested-interval forecast editor that preserves
//!   `0 <= lower95 <= lower50 <= median <= upper50 <= upper95` under
//!   arbitrary single-field edits
//! - Submission validation with per-horizon issue messages
//! - RMSE scoring against hub models and other participants, with a
//!   stable best-first ranking
//!
//! ## Quick Start
//!
//! ```no_run
//! use forecast_challenge::challenge::DailyChallenge;
//! use forecast_challenge::clock::EasternClock;
//! use forecast_challenge::config::ChallengeConfig;
//! use forecast_challenge::data::FileDataSource;
//! use forecast_challenge::scoring::{rank_forecasters, score_models, score_submission};
//! use forecast_challenge::session::ForecastSession;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ChallengeConfig::default();
//!     let source = FileDataSource::new("processed_data");
//!
//!     // One scenario per slot, identical for everyone today.
//!     let daily = DailyChallenge::generate(&EasternClock, &config, &source)?;
//!     let scenario = daily.available().next().ok_or("no challenge available")?;
//!
//!     // Edit the default intervals, then freeze a validated payload.
//!     let session = ForecastSession::new(scenario, &config);
//!     let payload = session.submission_payload()?;
//!
//!     // Score against the revealed outcomes and rank against the models.
//!     let user = score_submission(&payload, &scenario.horizon_observations);
//!     let models = score_models(
//!         &scenario.model_forecasts,
//!         &scenario.horizons,
//!         &scenario.horizon_observations,
//!     );
//!     let ranking = rank_forecasters("You", &user, &models, &[]);
//!     println!("rank: {:?}", ranking.user_rank());
//!     Ok(())
//! }
//! ```

pub mod challenge;
pub mod clock;
pub mod config;
pub mod data;
pub mod error;
pub mod scenario;
pub mod scoring;
pub mod session;
pub mod transport;
pub mod validation;

// Re-export commonly used types
pub use crate::challenge::DailyChallenge;
pub use crate::clock::{EasternClock, FixedClock, WallClock};
pub use crate::config::{ChallengeConfig, DatasetConfig, HistoryWindow};
pub use crate::data::{FileDataSource, MemoryDataSource, ScenarioDataSource};
pub use crate::error::ChallengeError;
pub use crate::scenario::{Scenario, ScenarioKey};
pub use crate::scoring::{Ranking, RankingEntry, ScoreResult};
pub use crate::session::{DragCoalescer, EditIntent, ForecastSession, Handle};
pub use crate::validation::SubmissionPayload;
pub use challenge_math::intervals::{IntervalEdit, IntervalEntry};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
