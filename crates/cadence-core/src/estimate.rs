//! Bounded work-duration estimation for a single block.
//!
//! The estimate for a block is the larger of two independently computed
//! figures:
//!
//! - the *buffered* estimate: the observed span between first and last event,
//!   padded with fixed preparation and wrap-up buffers;
//! - the *floor* estimate: a minimum implied by the event count alone, plus
//!   the preparation buffer.
//!
//! The floor keeps a burst of events crammed into a short span from being
//! under-credited; the buffered figure keeps a sparse block from being
//! credited beyond the observed span plus the fixed buffers. The two figures
//! are never mixed mid-formula.

use serde::{Deserialize, Serialize};

use crate::hours::duration_to_hours;
use crate::segment::WorkBlock;
use crate::types::{ValidationError, validate_hours};

/// Default minimum attributable time per event: 1/6 hour (10 minutes).
pub const DEFAULT_PER_EVENT_MIN_HOURS: f64 = 1.0 / 6.0;

/// Default assumed preparation time before the first event of a block.
pub const DEFAULT_PRE_WORK_BUFFER_HOURS: f64 = 0.5;

/// Tunable constants for the duration model.
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Minimum attributable time per event, in hours. Default: 1/6.
    pub per_event_min_hours: f64,

    /// Assumed preparation time before the first event of a block, in hours.
    /// Default: 0.5.
    pub pre_work_buffer_hours: f64,

    /// Assumed wrap-up time after the last event of a block, in hours.
    /// Default: same as `per_event_min_hours`.
    pub post_work_buffer_hours: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            per_event_min_hours: DEFAULT_PER_EVENT_MIN_HOURS,
            pre_work_buffer_hours: DEFAULT_PRE_WORK_BUFFER_HOURS,
            post_work_buffer_hours: DEFAULT_PER_EVENT_MIN_HOURS,
        }
    }
}

impl EstimatorConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_hours("per_event_min_hours", self.per_event_min_hours)?;
        validate_hours("pre_work_buffer_hours", self.pre_work_buffer_hours)?;
        validate_hours("post_work_buffer_hours", self.post_work_buffer_hours)
    }
}

/// A work block together with its estimated hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockEstimate {
    /// The block the estimate was computed for.
    pub block: WorkBlock,

    /// Estimated hours. Never negative, never below the per-event floor.
    pub hours: f64,
}

/// Estimates hours worked for one block.
pub fn estimate(
    block: &WorkBlock,
    config: &EstimatorConfig,
) -> Result<BlockEstimate, ValidationError> {
    config.validate()?;
    Ok(BlockEstimate {
        block: block.clone(),
        hours: block_hours(block, config),
    })
}

/// Computes the hours figure for a block, assuming a validated config.
///
/// The degenerate branch keys on `event_count == 1` rather than
/// `start == end`: a multi-event block whose events all share one instant
/// still gets its per-event floor, which keeps the estimate monotonically
/// non-decreasing in the event count at zero span.
pub(crate) fn block_hours(block: &WorkBlock, config: &EstimatorConfig) -> f64 {
    if block.event_count == 1 {
        return config.pre_work_buffer_hours + config.per_event_min_hours;
    }

    let span = duration_to_hours(block.span());
    let buffered = config.pre_work_buffer_hours + span + config.post_work_buffer_hours;
    #[allow(clippy::cast_precision_loss)]
    let floor =
        block.event_count as f64 * config.per_event_min_hours + config.pre_work_buffer_hours;
    buffered.max(floor)
}
