//! Top-level orchestration of one day's challenges
//!
//! The wall clock is bound exactly once, here; everything below takes the
//! date key as an explicit input, which is what makes determinism testable
//! without mocking time.

use crate::clock::WallClock;
use crate::config::ChallengeConfig;
use crate::data::ScenarioDataSource;
use crate::error::Result;
use crate::scenario::{generate_challenges, Scenario, SlotResults};

/// One day's generated challenge slots.
///
/// Generation is idempotent per date key: as long as the key has not
/// rolled over (midnight Eastern), regenerating produces the same
/// scenarios, so a value of this type is safe to cache keyed on
/// `date_key`.
#[derive(Debug)]
pub struct DailyChallenge {
    pub date_key: String,
    pub slots: SlotResults,
}

impl DailyChallenge {
    /// Read the clock once and generate every slot for that date.
    pub fn generate(
        clock: &dyn WallClock,
        config: &ChallengeConfig,
        source: &dyn ScenarioDataSource,
    ) -> Result<Self> {
        let date_key = clock.date_key();
        let slots = generate_challenges(&date_key, config, source)?;
        Ok(Self { date_key, slots })
    }

    /// The slots that resolved to a scenario, in slot order.
    pub fn available(&self) -> impl Iterator<Item = &Scenario> {
        self.slots.iter().filter_map(|slot| slot.as_ref().ok())
    }

    /// Whether at least one slot has a playable scenario.
    pub fn has_any(&self) -> bool {
        self.available().next().is_some()
    }
}
