//! Nested prediction intervals and their constrained edit operation
//!
//! A forecast entry is a median with two nested uncertainty bands. The
//! ordering invariant
//! `0 <= lower95 <= lower50 <= median <= upper50 <= upper95`
//! must hold after every single-field edit, in whatever order edits arrive,
//! so the edit rules live here as one pure reducer shared by every editor.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// One forecast entry: a median and two nested uncertainty bands for a
/// single horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalEntry {
    /// Weeks ahead of the issue date
    pub horizon: u32,
    /// Point forecast (quantile 0.5)
    pub median: f64,
    /// Lower bound of the 50% band (quantile 0.25)
    pub lower50: f64,
    /// Upper bound of the 50% band (quantile 0.75)
    pub upper50: f64,
    /// Lower bound of the 95% band (quantile 0.025)
    pub lower95: f64,
    /// Upper bound of the 95% band (quantile 0.975)
    pub upper95: f64,
}

/// A single-field edit of one entry.
///
/// Each variant re-establishes the ordering invariant before returning, so
/// a drag stream may interleave kinds freely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntervalEdit {
    /// Move the median, translating both bands with it
    Median(f64),
    /// Replace the 95% band; the 50% band is clamped inward to stay nested
    Band95 { lower: f64, upper: f64 },
    /// Replace the 50% band; clamped to lie within the 95% band
    Band50 { lower: f64, upper: f64 },
}

impl IntervalEntry {
    /// Checked constructor: all fields finite, non-negative, ordered.
    pub fn new(
        horizon: u32,
        median: f64,
        lower50: f64,
        upper50: f64,
        lower95: f64,
        upper95: f64,
    ) -> Result<Self> {
        let entry = Self {
            horizon,
            median,
            lower50,
            upper50,
            lower95,
            upper95,
        };
        if !entry.is_ordered() {
            return Err(MathError::InvalidInput(format!(
                "interval bounds for horizon {} are not ordered",
                horizon
            )));
        }
        Ok(entry)
    }

    /// A degenerate zero-width entry at the given value.
    pub fn point(horizon: u32, value: f64) -> Self {
        let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
        Self {
            horizon,
            median: value,
            lower50: value,
            upper50: value,
            lower95: value,
            upper95: value,
        }
    }

    /// Whether the ordering invariant holds (all fields finite and
    /// `0 <= lower95 <= lower50 <= median <= upper50 <= upper95`).
    pub fn is_ordered(&self) -> bool {
        let bounds = [
            self.lower95,
            self.lower50,
            self.median,
            self.upper50,
            self.upper95,
        ];
        if bounds.iter().any(|b| !b.is_finite()) {
            return false;
        }
        0.0 <= self.lower95
            && self.lower95 <= self.lower50
            && self.lower50 <= self.median
            && self.median <= self.upper50
            && self.upper50 <= self.upper95
    }
}

/// Half-width of a Poisson-style default band: `round(z * sqrt(mean))`,
/// zero for a non-positive or non-finite mean.
pub fn poisson_width(mean: f64, z_score: f64) -> f64 {
    if !mean.is_finite() || mean <= 0.0 {
        return 0.0;
    }
    (z_score * mean.sqrt()).round()
}

/// Build the default entries for a fresh forecast: the median sits at the
/// baseline (the most recent observation) and both bands use the Poisson
/// approximation, floored at zero. A non-positive baseline degenerates to
/// point entries at zero width.
pub fn initialise_entries(
    horizons: &[u32],
    baseline: f64,
    z_score_95: f64,
    z_score_50: f64,
) -> Vec<IntervalEntry> {
    let mean = if baseline.is_finite() && baseline > 0.0 {
        baseline
    } else {
        0.0
    };
    let width95 = poisson_width(mean, z_score_95);
    let width50 = poisson_width(mean, z_score_50);

    horizons
        .iter()
        .map(|&horizon| IntervalEntry {
            horizon,
            median: mean,
            lower50: (mean - width50).max(0.0),
            upper50: mean + width50,
            lower95: (mean - width95).max(0.0),
            upper95: mean + width95,
        })
        .collect()
}

/// Apply one edit to an entry, returning the next entry.
///
/// Pure and total: a non-finite edit value leaves the entry unchanged, and
/// the ordering invariant holds on the result whenever it held on the
/// input.
pub fn apply_interval_edit(entry: &IntervalEntry, edit: IntervalEdit) -> IntervalEntry {
    let mut next = *entry;
    match edit {
        IntervalEdit::Median(value) => {
            if !value.is_finite() {
                return next;
            }
            let median = value.max(0.0);
            let shift = median - entry.median;
            next.median = median;
            // Translate, never rescale; only lower bounds need the floor
            // because the uppers travel with a median that stays >= 0.
            next.lower95 = (entry.lower95 + shift).max(0.0);
            next.upper95 = entry.upper95 + shift;
            next.lower50 = (entry.lower50 + shift).max(0.0);
            next.upper50 = entry.upper50 + shift;
        }
        IntervalEdit::Band95 { lower, upper } => {
            if !lower.is_finite() || !upper.is_finite() {
                return next;
            }
            let lower95 = lower.max(0.0);
            let upper95 = upper.max(lower95);
            next.lower95 = lower95;
            next.upper95 = upper95;
            // The 50% band must stay nested: clamp it inward to the new
            // 95% bounds, then pull the median along if the band crossed it.
            next.lower50 = entry.lower50.clamp(lower95, upper95);
            next.upper50 = entry.upper50.clamp(lower95, upper95);
            next.median = entry.median.clamp(next.lower50, next.upper50);
        }
        IntervalEdit::Band50 { lower, upper } => {
            if !lower.is_finite() || !upper.is_finite() {
                return next;
            }
            let mut lower50 = lower.clamp(entry.lower95, entry.upper95);
            let mut upper50 = upper.clamp(entry.lower95, entry.upper95);
            if lower50 > upper50 {
                // Inverted after clamping: collapse to the midpoint.
                let midpoint = (lower50 + upper50) / 2.0;
                lower50 = midpoint;
                upper50 = midpoint;
            }
            next.lower50 = lower50;
            next.upper50 = upper50;
            next.median = entry.median.clamp(lower50, upper50);
        }
    }
    next
}
