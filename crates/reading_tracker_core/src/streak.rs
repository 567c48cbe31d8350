//! crates/reading_tracker_core/src/streak.rs
//!
//! Daily reading streaks. The same rule is applied to every scope that keeps a
//! streak (a folder, or a user's aggregate progress).

use chrono::{Days, NaiveDate};

/// A streak counter paired with the day it was last advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Streak {
    pub last_read_date: Option<NaiveDate>,
    pub count: u32,
}

impl Streak {
    /// Records reading activity on `today`.
    ///
    /// Reading on the day after `last_read_date` extends the streak, reading
    /// again on the same day keeps it, and anything else starts over at 1.
    pub fn record(self, today: NaiveDate) -> Streak {
        let (last_read_date, count) = next_streak(self.last_read_date, today, self.count);
        Streak {
            last_read_date: Some(last_read_date),
            count,
        }
    }
}

/// Computes `(new_last_read_date, new_count)` for activity on `today`.
pub fn next_streak(last_read_date: Option<NaiveDate>, today: NaiveDate, count: u32) -> (NaiveDate, u32) {
    let yesterday = today.checked_sub_days(Days::new(1));
    let count = match last_read_date {
        Some(last) if Some(last) == yesterday => count.saturating_add(1),
        Some(last) if last == today => count,
        _ => 1,
    };
    (today, count)
}
