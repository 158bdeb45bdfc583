//! Work session reconstruction and productivity analytics over commit
//! timestamps.
//!
//! The engine turns a sparse, irregular point process (commit timestamps)
//! into a bounded, explainable estimate of continuous work duration:
//!
//! - Segmentation: chronological events split into work blocks at idle gaps
//! - Estimation: bounded heuristic hours per block
//! - Aggregation: hour/weekday histograms, peaks, streaks, rollups
//!
//! Everything is pure computation over an in-memory event list. Fetching
//! events from a source-control host, filtering by author, and rendering
//! reports are the caller's concern.

pub mod estimate;
pub mod event;
pub mod hours;
pub mod report;
pub mod rhythm;
pub mod rollup;
pub mod segment;
pub mod streak;
pub mod types;

pub use estimate::{BlockEstimate, EstimatorConfig, estimate};
pub use event::Event;
pub use hours::{duration_to_hours, format_hours, hours_to_duration};
pub use report::{WorkHoursReport, work_hours};
pub use rhythm::{
    RhythmConfig, RhythmReport, RhythmSummary, analyze, daily_breakdown_hours, total_range_hours,
};
pub use rollup::{MonthKey, ParsePeriodKeyError, PeriodRollups, WeekKey};
pub use segment::{SegmenterConfig, WorkBlock, segment};
pub use streak::{StreakInfo, compute_streaks};
pub use types::{EventId, ValidationError};
