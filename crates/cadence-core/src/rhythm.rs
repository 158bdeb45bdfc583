//! Productivity rhythm aggregation.
//!
//! Consumes the full event list for a period (already date-filtered by the
//! caller) and produces rhythm statistics: commit histograms by hour of day
//! and weekday, estimated hours allocated across the same axes, the active
//! hour span, day streaks, and weekly/monthly rollups.
//!
//! Two segmentation paths coexist on purpose. [`total_range_hours`] segments
//! the entire chronological list once, so a session that crosses midnight
//! counts as one block. [`daily_breakdown_hours`] re-segments each calendar
//! day independently, and is what the per-day, per-hour and per-weekday
//! figures are built from. Unifying the two would silently change the
//! totals, so they are kept as distinct, separately tested operations.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::estimate::{EstimatorConfig, block_hours};
use crate::event::Event;
use crate::rollup::{PeriodRollups, rollup_periods};
use crate::segment::{SegmenterConfig, segment_sorted};
use crate::streak::{StreakInfo, compute_streaks};
use crate::types::ValidationError;

/// Weekday keys in Monday-first canonical order.
const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Configuration for a rhythm analysis.
#[derive(Debug, Clone, Default)]
pub struct RhythmConfig {
    /// Work block segmentation parameters.
    pub segmenter: SegmenterConfig,

    /// Duration model parameters.
    pub estimator: EstimatorConfig,
}

impl RhythmConfig {
    /// Validates both nested configurations.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.segmenter.validate()?;
        self.estimator.validate()
    }
}

/// Aggregate rhythm statistics for a period.
///
/// Histograms are fixed-size arrays with guaranteed full coverage — inactive
/// slots hold 0 rather than being absent. Hour-of-day values are 0..=23;
/// weekday slots run Monday..Sunday. Peak and earliest/latest fields are
/// `None` when the period has no events.
///
/// Recomputed fresh per call; never persisted or incrementally mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RhythmSummary {
    /// Total number of events in the period.
    pub total_commits: usize,

    /// Number of distinct calendar days with at least one event.
    pub total_active_days: usize,

    /// Mean events per active day.
    pub avg_commits_per_day: f64,

    /// Sum of event weights (e.g. files touched) where present.
    pub total_weight: u64,

    /// Event counts per hour of day.
    pub hourly_histogram: [u32; 24],

    /// Event counts per weekday, Monday first.
    pub weekday_histogram: [u32; 7],

    /// Estimated hours allocated per hour of day.
    ///
    /// This is an allocation heuristic, not a re-measurement: each day's
    /// estimated hours are spread over its active hours in proportion to
    /// that day's event counts.
    pub hourly_hours: [f64; 24],

    /// Estimated hours per weekday, Monday first.
    pub weekday_hours: [f64; 7],

    /// Hour of day with the most events; ties break to the smallest hour.
    pub peak_hour: Option<u32>,

    /// Weekday with the most events; ties break Monday-first.
    pub peak_weekday: Option<Weekday>,

    /// Smallest hour of day with at least one event.
    pub earliest_active_hour: Option<u32>,

    /// Largest hour of day with at least one event.
    pub latest_active_hour: Option<u32>,

    /// Width of the active hour-of-day span, inclusive: latest - earliest
    /// + 1. A descriptive span over the hour axis, not elapsed hours.
    pub work_span_hours: u32,

    /// First and last active calendar dates.
    pub active_date_range: Option<(NaiveDate, NaiveDate)>,

    /// Estimated hours from segmenting the whole range in one pass.
    pub total_work_hours: f64,

    /// Estimated hours per calendar day, each day segmented independently.
    pub daily_hours: BTreeMap<NaiveDate, f64>,

    /// Weekly and monthly commit rollups.
    pub rollups: PeriodRollups,
}

/// Result of a full rhythm analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RhythmReport {
    /// Aggregate rhythm statistics.
    pub summary: RhythmSummary,

    /// Consecutive-day streaks, anchored at the `now` passed to [`analyze`].
    pub streaks: StreakInfo,
}

/// Per-day accumulator used while folding events.
#[derive(Debug, Default)]
struct DayBucket {
    stamps: Vec<DateTime<Utc>>,
    hour_counts: [u32; 24],
}

/// Analyzes the rhythm of a period of activity.
///
/// `now` anchors the current-streak computation only. An empty event list is
/// a valid input and produces a fully populated zero summary, not an error.
/// The result is independent of the input order.
pub fn analyze(
    events: &[Event],
    now: DateTime<Utc>,
    config: &RhythmConfig,
) -> Result<RhythmReport, ValidationError> {
    config.validate()?;

    if events.is_empty() {
        return Ok(RhythmReport::default());
    }

    let threshold = config.segmenter.gap_threshold();

    let mut days: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
    let mut total_weight = 0u64;
    for event in events {
        let bucket = days.entry(event.timestamp.date_naive()).or_default();
        bucket.stamps.push(event.timestamp);
        bucket.hour_counts[event.timestamp.hour() as usize] += 1;
        total_weight = total_weight.saturating_add(u64::from(event.weight.unwrap_or(0)));
    }

    let mut summary = RhythmSummary {
        total_commits: events.len(),
        total_active_days: days.len(),
        total_weight,
        ..RhythmSummary::default()
    };
    #[allow(clippy::cast_precision_loss)]
    {
        summary.avg_commits_per_day = events.len() as f64 / days.len() as f64;
    }

    let mut date_counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();

    for (&date, bucket) in &mut days {
        bucket.stamps.sort();
        let day_hours: f64 = segment_sorted(&bucket.stamps, threshold)
            .iter()
            .map(|block| block_hours(block, &config.estimator))
            .sum();

        let events_in_day = u32::try_from(bucket.stamps.len()).unwrap_or(u32::MAX);
        summary.daily_hours.insert(date, day_hours);
        date_counts.insert(date, events_in_day);

        let weekday = date.weekday().num_days_from_monday() as usize;
        summary.weekday_histogram[weekday] += events_in_day;
        summary.weekday_hours[weekday] += day_hours;

        for (hour, &count) in bucket.hour_counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            summary.hourly_histogram[hour] += count;
            summary.hourly_hours[hour] +=
                day_hours * f64::from(count) / f64::from(events_in_day);
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    {
        summary.peak_hour = peak_index(&summary.hourly_histogram).map(|h| h as u32);
    }
    summary.peak_weekday = peak_index(&summary.weekday_histogram).map(|d| WEEKDAYS[d]);

    let mut active_hours = (0..24u32).filter(|&h| summary.hourly_histogram[h as usize] > 0);
    let earliest = active_hours.next();
    let latest = active_hours.last().or(earliest);
    summary.earliest_active_hour = earliest;
    summary.latest_active_hour = latest;
    if let (Some(earliest), Some(latest)) = (earliest, latest) {
        summary.work_span_hours = latest - earliest + 1;
    }

    summary.active_date_range = match (days.first_key_value(), days.last_key_value()) {
        (Some((&first, _)), Some((&last, _))) => Some((first, last)),
        _ => None,
    };

    summary.total_work_hours = total_range_hours(events, config)?;
    summary.rollups = rollup_periods(&date_counts);

    let active_dates: BTreeSet<NaiveDate> = days.keys().copied().collect();
    let streaks = compute_streaks(&active_dates, now.date_naive());

    tracing::debug!(
        commits = summary.total_commits,
        active_days = summary.total_active_days,
        total_hours = summary.total_work_hours,
        "analyzed activity rhythm"
    );

    Ok(RhythmReport { summary, streaks })
}

/// Estimated hours over the whole range, segmenting the entire chronological
/// list once. A session that crosses midnight counts as one block here.
pub fn total_range_hours(events: &[Event], config: &RhythmConfig) -> Result<f64, ValidationError> {
    config.validate()?;

    let mut stamps: Vec<DateTime<Utc>> = events.iter().map(|e| e.timestamp).collect();
    stamps.sort();

    Ok(segment_sorted(&stamps, config.segmenter.gap_threshold())
        .iter()
        .map(|block| block_hours(block, &config.estimator))
        .sum())
}

/// Estimated hours per calendar day, re-segmenting each day independently.
///
/// A block that would logically straddle midnight is split between the two
/// days here, so the sum over days can differ from [`total_range_hours`].
pub fn daily_breakdown_hours(
    events: &[Event],
    config: &RhythmConfig,
) -> Result<BTreeMap<NaiveDate, f64>, ValidationError> {
    config.validate()?;

    let threshold = config.segmenter.gap_threshold();
    let mut days: BTreeMap<NaiveDate, Vec<DateTime<Utc>>> = BTreeMap::new();
    for event in events {
        days.entry(event.timestamp.date_naive())
            .or_default()
            .push(event.timestamp);
    }

    Ok(days
        .into_iter()
        .map(|(date, mut stamps)| {
            stamps.sort();
            let hours = segment_sorted(&stamps, threshold)
                .iter()
                .map(|block| block_hours(block, &config.estimator))
                .sum();
            (date, hours)
        })
        .collect())
}

/// Index of the maximal nonzero count; ascending scan breaks ties toward the
/// smallest index. `None` when every slot is zero.
fn peak_index<const N: usize>(counts: &[u32; N]) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (index, &count) in counts.iter().enumerate() {
        if count > 0 && best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((index, count));
        }
    }
    best.map(|(index, _)| index)
}
