//! Time source for the engine.
//!
//! All temporal rules (combo window, week boundary, daily reset, early-bird
//! cutoff) are pure functions of the value returned by [`Clock::now`]. The
//! offset is kept so "local date" and "local hour" stay well defined.

use std::cell::Cell;

use chrono::{DateTime, Duration, FixedOffset, Local};

/// Local wall-clock timestamp with its UTC offset.
pub type Timestamp = DateTime<FixedOffset>;

pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Reads the system clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Local::now().fixed_offset()
    }
}

/// Settable clock for tests and replays.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<Timestamp>,
}

impl ManualClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    /// Start at an RFC 3339 timestamp such as `2026-10-19T10:00:00+00:00`.
    pub fn parse(rfc3339: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(rfc3339).map(Self::new)
    }

    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::parse("2026-10-19T08:00:00+02:00").unwrap();
        clock.advance(Duration::minutes(90));
        assert_eq!(clock.now().to_rfc3339(), "2026-10-19T09:30:00+02:00");
    }
}
