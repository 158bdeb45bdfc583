//! Weekly and monthly activity rollups.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// An ISO 8601 week (Monday-start), e.g. `2025-W03`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    /// ISO week-numbering year. Near year boundaries this can differ from
    /// the calendar year of the dates in the week.
    pub year: i32,
    /// ISO week number, 1..=53.
    pub week: u32,
}

impl From<NaiveDate> for WeekKey {
    fn from(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl FromStr for WeekKey {
    type Err = ParsePeriodKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePeriodKeyError(s.to_string());
        let (year, week) = s.split_once("-W").ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let week: u32 = week.parse().map_err(|_| err())?;
        if !(1..=53).contains(&week) {
            return Err(err());
        }
        Ok(Self { year, week })
    }
}

/// A calendar month, e.g. `2025-01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    /// Calendar month, 1..=12.
    pub month: u32,
}

impl From<NaiveDate> for MonthKey {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ParsePeriodKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePeriodKeyError(s.to_string());
        let (year, month) = s.rsplit_once('-').ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        if !(1..=12).contains(&month) {
            return Err(err());
        }
        Ok(Self { year, month })
    }
}

macro_rules! string_serde {
    ($name:ident) => {
        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_serde!(WeekKey);
string_serde!(MonthKey);

/// Error type for unparseable period key strings.
#[derive(Debug, Clone)]
pub struct ParsePeriodKeyError(String);

impl fmt::Display for ParsePeriodKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid period key: {}", self.0)
    }
}

impl std::error::Error for ParsePeriodKeyError {}

/// Commit counts rolled up into ISO weeks and calendar months.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodRollups {
    /// Commit counts per ISO week with activity.
    pub weekly_commits: BTreeMap<WeekKey, u32>,

    /// Commit counts per calendar month with activity.
    pub monthly_commits: BTreeMap<MonthKey, u32>,

    /// The count-maximal week; ties break to the earliest week.
    pub busiest_week: Option<WeekKey>,

    /// The count-maximal month; ties break to the earliest month.
    pub busiest_month: Option<MonthKey>,

    /// Mean commits over weeks with activity.
    pub avg_commits_per_week: f64,

    /// Mean commits over months with activity.
    pub avg_commits_per_month: f64,
}

/// Rolls up per-date commit counts into weekly and monthly summaries.
pub(crate) fn rollup_periods(date_counts: &BTreeMap<NaiveDate, u32>) -> PeriodRollups {
    let mut weekly: BTreeMap<WeekKey, u32> = BTreeMap::new();
    let mut monthly: BTreeMap<MonthKey, u32> = BTreeMap::new();

    for (&date, &count) in date_counts {
        *weekly.entry(WeekKey::from(date)).or_insert(0) += count;
        *monthly.entry(MonthKey::from(date)).or_insert(0) += count;
    }

    let busiest_week = max_by_count(&weekly);
    let busiest_month = max_by_count(&monthly);
    let avg_commits_per_week = mean_count(&weekly);
    let avg_commits_per_month = mean_count(&monthly);

    PeriodRollups {
        weekly_commits: weekly,
        monthly_commits: monthly,
        busiest_week,
        busiest_month,
        avg_commits_per_week,
        avg_commits_per_month,
    }
}

/// Finds the key with the maximal count; ascending iteration means ties go
/// to the earliest period.
fn max_by_count<K: Copy + Ord>(counts: &BTreeMap<K, u32>) -> Option<K> {
    let mut best: Option<(K, u32)> = None;
    for (&key, &count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((key, count));
        }
    }
    best.map(|(key, _)| key)
}

#[allow(clippy::cast_precision_loss)]
fn mean_count<K>(counts: &BTreeMap<K, u32>) -> f64 {
    if counts.is_empty() {
        return 0.0;
    }
    let total: u64 = counts.values().map(|&c| u64::from(c)).sum();
    total as f64 / counts.len() as f64
}
