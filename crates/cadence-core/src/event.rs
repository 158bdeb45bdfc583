//! Commit activity events consumed by the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{EventId, ValidationError};

/// A single timestamped activity record (e.g. one commit).
///
/// All events within one computation belong to a single actor; filtering by
/// author is the job of whatever fetches the events. Timestamps must already
/// be normalized to UTC at that boundary — the engine treats them as directly
/// comparable and never adjusts time zones itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Opaque identifier (e.g. a commit SHA).
    pub id: EventId,

    /// When the event occurred.
    pub timestamp: DateTime<Utc>,

    /// Optional per-event weight, such as the number of files touched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

impl Event {
    /// Creates an event with no weight.
    #[must_use]
    pub const fn new(id: EventId, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            timestamp,
            weight: None,
        }
    }

    /// Creates an event carrying a weight.
    ///
    /// A negative weight is an input error and is rejected, never clamped.
    pub fn with_weight(
        id: EventId,
        timestamp: DateTime<Utc>,
        weight: i64,
    ) -> Result<Self, ValidationError> {
        let weight =
            u32::try_from(weight).map_err(|_| ValidationError::InvalidWeight { value: weight })?;
        Ok(Self {
            id,
            timestamp,
            weight: Some(weight),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 14, 30, 0)
            .single()
            .expect("valid test timestamp")
    }

    #[test]
    fn with_weight_accepts_non_negative() {
        let event = Event::with_weight(EventId::new("c1").unwrap(), ts(), 7).unwrap();
        assert_eq!(event.weight, Some(7));

        let event = Event::with_weight(EventId::new("c2").unwrap(), ts(), 0).unwrap();
        assert_eq!(event.weight, Some(0));
    }

    #[test]
    fn with_weight_rejects_negative() {
        let result = Event::with_weight(EventId::new("c1").unwrap(), ts(), -3);
        assert_eq!(
            result.unwrap_err(),
            ValidationError::InvalidWeight { value: -3 }
        );
    }

    #[test]
    fn event_serialization_roundtrip() {
        let event = Event {
            id: EventId::new("a1b2c3d").unwrap(),
            timestamp: ts(),
            weight: Some(4),
        };

        let json = serde_json::to_string(&event).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, event);
    }

    #[test]
    fn event_without_weight_omits_field() {
        let event = Event::new(EventId::new("a1b2c3d").unwrap(), ts());
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("weight"));
    }

    #[test]
    fn event_rejects_empty_id() {
        let json = r#"{"id": "", "timestamp": "2025-03-10T14:30:00Z"}"#;
        let result: Result<Event, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
