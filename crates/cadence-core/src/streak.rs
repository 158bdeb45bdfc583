//! Consecutive-day activity streaks.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lengths of consecutive-day activity runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakInfo {
    /// Longest run of consecutive active days on record.
    pub longest_streak: u32,

    /// Run of consecutive active days ending at the most recent active date.
    /// Reported as 0 once that date is more than one day before "today" —
    /// the streak is considered broken by inactivity.
    pub current_streak: u32,
}

/// Computes streaks over a set of distinct active dates.
///
/// `today` anchors the current streak: a run whose last active date is today
/// or yesterday is still alive; anything older reports 0.
#[must_use]
pub fn compute_streaks(active_dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> StreakInfo {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;

    for &date in active_dates {
        run = match prev {
            Some(p) if (date - p).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(date);
    }

    let current = match active_dates.last() {
        Some(&last) if (today - last).num_days() <= 1 => run,
        _ => 0,
    };

    StreakInfo {
        longest_streak: longest,
        current_streak: current,
    }
}
