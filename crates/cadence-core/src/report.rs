//! Single-period work-hours report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::estimate::{BlockEstimate, estimate};
use crate::event::Event;
use crate::rhythm::RhythmConfig;
use crate::segment::segment;
use crate::types::ValidationError;

/// Estimated work hours for one period, with the per-block breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkHoursReport {
    /// Sum of the block estimates.
    pub total_hours: f64,

    /// Timestamp of the earliest event, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_event_at: Option<DateTime<Utc>>,

    /// Timestamp of the latest event, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_event_at: Option<DateTime<Utc>>,

    /// The detected work blocks with their estimates, in chronological order.
    pub blocks: Vec<BlockEstimate>,
}

/// Computes the work-hours report for a list of events.
///
/// Segments the list once across its whole range and estimates each block.
/// An empty list produces a zero report, not an error.
pub fn work_hours(
    events: &[Event],
    config: &RhythmConfig,
) -> Result<WorkHoursReport, ValidationError> {
    config.validate()?;

    let blocks = segment(events, &config.segmenter)?;
    let estimates: Vec<BlockEstimate> = blocks
        .iter()
        .map(|block| estimate(block, &config.estimator))
        .collect::<Result<_, _>>()?;

    let total_hours = estimates.iter().map(|e| e.hours).sum();

    Ok(WorkHoursReport {
        total_hours,
        first_event_at: estimates.first().map(|e| e.block.start),
        last_event_at: estimates.last().map(|e| e.block.end),
        blocks: estimates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    use crate::types::EventId;

    const EPS: f64 = 1e-9;

    fn ts(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0)
            .single()
            .expect("valid test timestamp")
            + Duration::minutes(minutes)
    }

    fn events_at(minutes: &[i64]) -> Vec<Event> {
        minutes
            .iter()
            .enumerate()
            .map(|(i, &m)| Event::new(EventId::new(format!("e{i}")).unwrap(), ts(m)))
            .collect()
    }

    #[test]
    fn test_empty_events_yield_zero_report() {
        let report = work_hours(&[], &RhythmConfig::default()).unwrap();

        assert!(report.total_hours.abs() < EPS);
        assert_eq!(report.first_event_at, None);
        assert_eq!(report.last_event_at, None);
        assert!(report.blocks.is_empty());
    }

    #[test]
    fn test_single_commit() {
        let report = work_hours(&events_at(&[0]), &RhythmConfig::default()).unwrap();

        assert!((report.total_hours - (0.5 + 1.0 / 6.0)).abs() < EPS);
        assert_eq!(report.first_event_at, Some(ts(0)));
        assert_eq!(report.last_event_at, Some(ts(0)));
        assert_eq!(report.blocks.len(), 1);
    }

    #[test]
    fn test_two_blocks_sum_and_endpoints() {
        // 09:00, 09:20, 09:45 and an isolated 13:00 commit.
        let report = work_hours(&events_at(&[0, 20, 45, 240]), &RhythmConfig::default()).unwrap();

        assert_eq!(report.blocks.len(), 2);
        assert!((report.blocks[0].hours - (0.5 + 0.75 + 1.0 / 6.0)).abs() < EPS);
        assert!((report.blocks[1].hours - (0.5 + 1.0 / 6.0)).abs() < EPS);

        let expected_total = (0.5 + 0.75 + 1.0 / 6.0) + (0.5 + 1.0 / 6.0);
        assert!((report.total_hours - expected_total).abs() < EPS);

        assert_eq!(report.first_event_at, Some(ts(0)));
        assert_eq!(report.last_event_at, Some(ts(240)));
    }

    #[test]
    fn test_blocks_are_chronological_even_for_unsorted_input() {
        let report = work_hours(&events_at(&[240, 0, 45, 20]), &RhythmConfig::default()).unwrap();

        assert_eq!(report.blocks.len(), 2);
        assert!(report.blocks[0].block.start < report.blocks[1].block.start);
        assert_eq!(report.first_event_at, Some(ts(0)));
        assert_eq!(report.last_event_at, Some(ts(240)));
    }

    #[test]
    fn test_report_serde_roundtrip() {
        let report = work_hours(&events_at(&[0, 20, 240]), &RhythmConfig::default()).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        let parsed: WorkHoursReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
