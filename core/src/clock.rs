//! Match clock: owns the tick counter the whole referee runs on.
//!
//! Time is kept as an ascending tick count. The countdown shown on screen
//! is derived from it, never stepped on its own.

use crate::error::{RefereeError, RefereeResult};
use crate::types::Tick;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchClock {
    /// Total match length in seconds.
    pub match_time:    u32,
    /// Length of one simulation step in milliseconds.
    pub tick_ms:       u64,
    pub elapsed_ticks: Tick,
}

impl MatchClock {
    pub fn new(match_time: u32, tick_ms: u64) -> Self {
        Self { match_time, tick_ms, elapsed_ticks: 0 }
    }

    /// Advance one tick. Returns the new tick number.
    pub fn advance(&mut self) -> Tick {
        self.elapsed_ticks += 1;
        self.elapsed_ticks
    }

    pub fn is_first_tick(&self) -> bool {
        self.elapsed_ticks == 0
    }

    /// Seconds per tick.
    pub fn tick_seconds(&self) -> f64 {
        self.tick_ms as f64 / 1000.0
    }

    /// Seconds since the match started.
    pub fn elapsed(&self) -> f64 {
        (self.elapsed_ticks * self.tick_ms) as f64 / 1000.0
    }

    pub fn time_remaining(&self) -> f64 {
        f64::from(self.match_time) - self.elapsed()
    }

    pub fn is_over(&self) -> bool {
        self.time_remaining() < 0.0
    }
}

/// Format seconds as `MM:SS` for the on-screen clock.
pub fn time_to_string(time: f64) -> RefereeResult<String> {
    if !time.is_finite() || time < 0.0 {
        return Err(RefereeError::InvalidTime(time));
    }
    let total = time.floor() as u64;
    Ok(format!("{:02}:{:02}", total / 60, total % 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_is_derived_from_ticks() {
        let mut clock = MatchClock::new(600, 64);
        assert!(clock.is_first_tick());
        assert_eq!(clock.time_remaining(), 600.0);

        clock.advance();
        assert!(!clock.is_first_tick());
        assert!((clock.time_remaining() - 599.936).abs() < 1e-9);
        assert!((clock.elapsed() - 0.064).abs() < 1e-12);
    }

    #[test]
    fn match_ends_one_tick_after_reaching_zero() {
        let mut clock = MatchClock::new(600, 64);
        for _ in 0..9375 {
            clock.advance();
        }
        assert_eq!(clock.time_remaining(), 0.0);
        assert!(!clock.is_over());
        clock.advance();
        assert!(clock.is_over());
    }

    #[test]
    fn time_formats_as_minutes_and_seconds() {
        assert_eq!(time_to_string(10.0).unwrap(), "00:10");
        assert_eq!(time_to_string(1234.0).unwrap(), "20:34");
        assert_eq!(time_to_string(0.0).unwrap(), "00:00");
        assert_eq!(time_to_string(599.936).unwrap(), "09:59");
    }

    #[test]
    fn negative_or_nan_time_is_rejected() {
        assert!(matches!(time_to_string(-1.0), Err(RefereeError::InvalidTime(_))));
        assert!(time_to_string(f64::NAN).is_err());
    }
}
