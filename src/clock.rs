//! Time sources for planting and harvest scheduling.
//!
//! Scheduling code never reads the system clock directly; it asks a `Clock`.
//! Production code uses `SystemClock`, tests pin time with `FixedClock`.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use std::sync::Mutex;

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock pinned to `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Pin the clock to the start (00:00 UTC) of the given day.
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(start_of_day(date))
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Midnight UTC at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_holds_still() {
        let date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let clock = FixedClock::at_date(date);
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().date_naive(), date);
    }

    #[test]
    fn test_fixed_clock_advance_and_set() {
        let date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let clock = FixedClock::at_date(date);

        clock.advance(TimeDelta::days(15));
        assert_eq!(
            clock.now().date_naive(),
            NaiveDate::from_ymd_opt(2026, 5, 16).unwrap()
        );

        let reset = start_of_day(date);
        clock.set(reset);
        assert_eq!(clock.now(), reset);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
