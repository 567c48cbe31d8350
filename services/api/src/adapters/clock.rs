//! services/api/src/adapters/clock.rs
//!
//! Implementations of the `Clock` port.

use chrono::{Local, NaiveDate};
use reading_tracker_core::ports::Clock;

/// Reads the calendar date from the server's local time zone.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same day.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
