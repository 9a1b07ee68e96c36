//! The interactive editing session for one scenario
//!
//! A drag gesture produces a stream of raw pointer samples. Those are
//! mapped to intents (`which horizon, which handle, what value`) and
//! coalesced to at most one model update per display frame; only the most
//! recent sample in a frame is applied, stale ones are discarded. Each
//! applied intent is a pure transform of the entry set, so releasing the
//! pointer simply stops updates; there is nothing to roll back.

use crate::config::ChallengeConfig;
use crate::error::Result;
use crate::scenario::{Scenario, ScenarioKey};
use crate::validation::SubmissionPayload;
use challenge_math::intervals::{
    apply_interval_edit, initialise_entries, IntervalEdit, IntervalEntry,
};

/// The draggable handles of one horizon entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Median,
    Lower95,
    Upper95,
    Lower50,
    Upper50,
}

/// One throttled edit intent derived from a pointer sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditIntent {
    pub horizon: u32,
    pub handle: Handle,
    pub value: f64,
}

/// Frame-rate throttle for drag streams: holds at most one pending
/// intent, newest wins.
#[derive(Debug, Default)]
pub struct DragCoalescer {
    pending: Option<EditIntent>,
}

impl DragCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw sample, replacing any stale one from the same frame.
    pub fn push(&mut self, intent: EditIntent) {
        self.pending = Some(intent);
    }

    /// Take the latest sample at the frame boundary, if any.
    pub fn take(&mut self) -> Option<EditIntent> {
        self.pending.take()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }
}

/// Owns and mutates the forecast entries for one scenario. No other
/// component writes to the entry set.
#[derive(Debug, Clone)]
pub struct ForecastSession {
    key: ScenarioKey,
    horizons: Vec<u32>,
    baseline: f64,
    z_score_95: f64,
    z_score_50: f64,
    entries: Vec<IntervalEntry>,
}

impl ForecastSession {
    /// Start a session with default intervals seeded from the scenario's
    /// most recent pre-issue-date observation.
    pub fn new(scenario: &Scenario, config: &ChallengeConfig) -> Self {
        let baseline = scenario.baseline_value();
        let entries = initialise_entries(
            &scenario.horizons,
            baseline,
            config.z_score_95,
            config.z_score_50,
        );
        Self {
            key: scenario.key.clone(),
            horizons: scenario.horizons.clone(),
            baseline,
            z_score_95: config.z_score_95,
            z_score_50: config.z_score_50,
            entries,
        }
    }

    pub fn key(&self) -> &ScenarioKey {
        &self.key
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    pub fn entries(&self) -> &[IntervalEntry] {
        &self.entries
    }

    /// Apply one intent. Returns false when the horizon is unknown (the
    /// intent is dropped, the session is untouched).
    pub fn apply(&mut self, intent: EditIntent) -> bool {
        let Some(index) = self
            .entries
            .iter()
            .position(|entry| entry.horizon == intent.horizon)
        else {
            return false;
        };
        let entry = self.entries[index];
        let edit = match intent.handle {
            Handle::Median => IntervalEdit::Median(intent.value),
            Handle::Lower95 => IntervalEdit::Band95 {
                lower: intent.value,
                upper: entry.upper95,
            },
            Handle::Upper95 => IntervalEdit::Band95 {
                lower: entry.lower95,
                upper: intent.value,
            },
            Handle::Lower50 => IntervalEdit::Band50 {
                lower: intent.value,
                upper: entry.upper50,
            },
            Handle::Upper50 => IntervalEdit::Band50 {
                lower: entry.lower50,
                upper: intent.value,
            },
        };
        self.entries[index] = apply_interval_edit(&entry, edit);
        true
    }

    /// Apply a whole-band edit directly (slider-style input).
    pub fn apply_edit(&mut self, horizon: u32, edit: IntervalEdit) -> bool {
        let Some(index) = self
            .entries
            .iter()
            .position(|entry| entry.horizon == horizon)
        else {
            return false;
        };
        let entry = self.entries[index];
        self.entries[index] = apply_interval_edit(&entry, edit);
        true
    }

    /// Drain the coalescer at a frame boundary and apply the surviving
    /// intent, if any. Returns whether the entries changed.
    pub fn apply_frame(&mut self, coalescer: &mut DragCoalescer) -> bool {
        match coalescer.take() {
            Some(intent) => self.apply(intent),
            None => false,
        }
    }

    /// Throw away all edits and restore the default intervals.
    pub fn reset(&mut self) {
        self.entries = initialise_entries(
            &self.horizons,
            self.baseline,
            self.z_score_95,
            self.z_score_50,
        );
    }

    /// Validate the current entries and freeze them into a payload.
    pub fn submission_payload(&self) -> Result<SubmissionPayload> {
        SubmissionPayload::from_entries(&self.entries)
    }
}
