//! Work block segmentation.
//!
//! Splits a set of events into contiguous work blocks based on temporal
//! proximity: consecutive events separated by more than the gap threshold
//! start a new block.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::hours::hours_to_duration;
use crate::types::{ValidationError, validate_hours};

/// Default idle gap, in hours, that closes a work block.
pub const DEFAULT_GAP_THRESHOLD_HOURS: f64 = 2.0;

/// Configuration for work block segmentation.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Maximum idle gap, in hours, allowed inside one block. Events separated
    /// by strictly more than this start a new block; a gap of exactly the
    /// threshold stays in the same block. Default: 2.0.
    pub gap_threshold_hours: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            gap_threshold_hours: DEFAULT_GAP_THRESHOLD_HOURS,
        }
    }
}

impl SegmenterConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_hours("gap_threshold_hours", self.gap_threshold_hours)
    }

    pub(crate) fn gap_threshold(&self) -> Duration {
        hours_to_duration(self.gap_threshold_hours)
    }
}

/// A maximal run of events with no internal gap exceeding the threshold.
///
/// Invariants: `start <= end` and `event_count >= 1`. A single-event block
/// has `start == end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkBlock {
    /// Timestamp of the first event in the block.
    pub start: DateTime<Utc>,

    /// Timestamp of the last event in the block.
    pub end: DateTime<Utc>,

    /// Number of events folded into the block.
    pub event_count: usize,
}

impl WorkBlock {
    /// Span between the first and last event of the block.
    #[must_use]
    pub fn span(&self) -> Duration {
        self.end - self.start
    }
}

/// Splits events into work blocks separated by idle gaps.
///
/// Events may arrive in any order; they are sorted by timestamp internally
/// with a stable sort, so equal timestamps keep their input order and the
/// result is deterministic. Duplicate timestamps are counted individually,
/// never deduplicated.
///
/// An empty input produces an empty block list, not an error — whether "no
/// events" is an error condition is the caller's decision.
pub fn segment(events: &[Event], config: &SegmenterConfig) -> Result<Vec<WorkBlock>, ValidationError> {
    config.validate()?;

    let mut stamps: Vec<DateTime<Utc>> = events.iter().map(|e| e.timestamp).collect();
    stamps.sort();

    let blocks = segment_sorted(&stamps, config.gap_threshold());
    tracing::debug!(
        events = events.len(),
        blocks = blocks.len(),
        "segmented events into work blocks"
    );
    Ok(blocks)
}

/// Segments timestamps that are already sorted ascending.
pub(crate) fn segment_sorted(stamps: &[DateTime<Utc>], threshold: Duration) -> Vec<WorkBlock> {
    let Some(&first) = stamps.first() else {
        return Vec::new();
    };

    let mut blocks = Vec::new();
    let mut start = first;
    let mut prev = first;
    let mut count = 1usize;

    for &stamp in &stamps[1..] {
        if stamp - prev > threshold {
            blocks.push(WorkBlock {
                start,
                end: prev,
                event_count: count,
            });
            start = stamp;
            count = 0;
        }
        prev = stamp;
        count += 1;
    }

    blocks.push(WorkBlock {
        start,
        end: prev,
        event_count: count,
    });
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::types::EventId;

    fn ts(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0)
            .single()
            .expect("valid test timestamp")
            + Duration::minutes(minutes)
    }

    fn event(id: &str, timestamp: DateTime<Utc>) -> Event {
        Event::new(EventId::new(id).unwrap(), timestamp)
    }

    fn events_at(minutes: &[i64]) -> Vec<Event> {
        minutes
            .iter()
            .enumerate()
            .map(|(i, &m)| event(&format!("e{i}"), ts(m)))
            .collect()
    }

    #[test]
    fn test_empty_input_yields_no_blocks() {
        let blocks = segment(&[], &SegmenterConfig::default()).unwrap();
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_single_event_yields_degenerate_block() {
        let events = events_at(&[0]);
        let blocks = segment(&events, &SegmenterConfig::default()).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start, blocks[0].end);
        assert_eq!(blocks[0].event_count, 1);
    }

    #[test]
    fn test_close_events_stay_in_one_block() {
        let events = events_at(&[0, 20, 45]);
        let blocks = segment(&events, &SegmenterConfig::default()).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start, ts(0));
        assert_eq!(blocks[0].end, ts(45));
        assert_eq!(blocks[0].event_count, 3);
    }

    #[test]
    fn test_gap_over_threshold_splits_block() {
        // 09:00, 09:20, 09:45, then 13:00 (3h15m gap)
        let events = events_at(&[0, 20, 45, 240]);
        let blocks = segment(&events, &SegmenterConfig::default()).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].start, ts(0));
        assert_eq!(blocks[0].end, ts(45));
        assert_eq!(blocks[0].event_count, 3);
        assert_eq!(blocks[1].start, ts(240));
        assert_eq!(blocks[1].end, ts(240));
        assert_eq!(blocks[1].event_count, 1);
    }

    #[test]
    fn test_gap_exactly_at_threshold_does_not_split() {
        // 8 events spaced exactly 2.0 hours apart must remain one block.
        let minutes: Vec<i64> = (0..8).map(|i| i * 120).collect();
        let events = events_at(&minutes);
        let blocks = segment(&events, &SegmenterConfig::default()).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].event_count, 8);
        assert_eq!(blocks[0].span(), Duration::hours(14));
    }

    #[test]
    fn test_gap_one_second_over_threshold_splits() {
        let events = vec![
            event("e0", ts(0)),
            event("e1", ts(120) + Duration::seconds(1)),
        ];
        let blocks = segment(&events, &SegmenterConfig::default()).unwrap();

        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_unsorted_input_is_sorted_internally() {
        let events = events_at(&[240, 45, 0, 20]);
        let blocks = segment(&events, &SegmenterConfig::default()).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].event_count, 3);
        assert_eq!(blocks[1].event_count, 1);
    }

    #[test]
    fn test_duplicate_timestamps_counted_individually() {
        let events = events_at(&[0, 0, 0]);
        let blocks = segment(&events, &SegmenterConfig::default()).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].event_count, 3);
        assert_eq!(blocks[0].start, blocks[0].end);
    }

    #[test]
    fn test_custom_threshold() {
        let config = SegmenterConfig {
            gap_threshold_hours: 0.5,
        };
        let events = events_at(&[0, 30, 61]);
        let blocks = segment(&events, &config).unwrap();

        // 30m gap stays, 31m gap splits.
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].event_count, 2);
        assert_eq!(blocks[1].event_count, 1);
    }

    #[test]
    fn test_block_counts_sum_to_input_length() {
        let events = events_at(&[0, 5, 200, 210, 500, 1000, 1001]);
        let blocks = segment(&events, &SegmenterConfig::default()).unwrap();

        let total: usize = blocks.iter().map(|b| b.event_count).sum();
        assert_eq!(total, events.len());
    }

    #[test]
    fn test_blocks_are_separated_by_more_than_threshold() {
        let events = events_at(&[0, 5, 200, 210, 500, 1000, 1001]);
        let config = SegmenterConfig::default();
        let blocks = segment(&events, &config).unwrap();

        for pair in blocks.windows(2) {
            assert!(pair[1].start - pair[0].end > config.gap_threshold());
        }
        for block in &blocks {
            assert!(block.start <= block.end);
            assert!(block.event_count >= 1);
        }
    }

    #[test]
    fn test_negative_threshold_is_rejected() {
        let config = SegmenterConfig {
            gap_threshold_hours: -1.0,
        };
        let result = segment(&events_at(&[0]), &config);
        assert!(matches!(
            result.unwrap_err(),
            ValidationError::InvalidHours { .. }
        ));
    }

    #[test]
    fn test_work_block_serde_roundtrip() {
        let block = WorkBlock {
            start: ts(0),
            end: ts(45),
            event_count: 3,
        };
        let json = serde_json::to_string(&block).unwrap();
        let parsed: WorkBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, block);
    }
}
