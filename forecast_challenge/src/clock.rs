//! Wall-clock date keys
//!
//! The daily challenge reseeds on the calendar date rendered in a fixed
//! time zone (US Eastern), never the client's local zone; otherwise two
//! visitors straddling midnight would see different challenges. The clock
//! is a trait so generation stays a pure function of an injected date key.

use chrono::Utc;
use chrono_tz::America::New_York;

/// Supplies the current challenge date key as `YYYY-MM-DD`.
pub trait WallClock {
    fn date_key(&self) -> String;
}

/// The production clock: today's date in US Eastern time.
#[derive(Debug, Clone, Copy, Default)]
pub struct EasternClock;

impl WallClock for EasternClock {
    fn date_key(&self) -> String {
        Utc::now()
            .with_timezone(&New_York)
            .format("%Y-%m-%d")
            .to_string()
    }
}

/// A pinned clock for tests and replays.
#[derive(Debug, Clone)]
pub struct FixedClock(pub String);

impl WallClock for FixedClock {
    fn date_key(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eastern_clock_yields_date_key_shape() {
        let key = EasternClock.date_key();
        assert_eq!(key.len(), 10);
        assert_eq!(key.as_bytes()[4], b'-');
        assert_eq!(key.as_bytes()[7], b'-');
    }

    #[test]
    fn test_fixed_clock_is_fixed() {
        let clock = FixedClock("2024-01-15".to_string());
        assert_eq!(clock.date_key(), "2024-01-15");
        assert_eq!(clock.date_key(), "2024-01-15");
    }
}
