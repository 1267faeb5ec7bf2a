//! Core record types for zonewatch.
//!
//! This module defines the fixed-shape occupancy record produced by the
//! external tracking process: seconds spent in each of the four tracked
//! zones plus a movement counter, stamped with the person it belongs to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A tracked zone.
///
/// The set of zones is fixed and closed; there are no dynamic zone names
/// anywhere in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// The primary desk.
    Desk1,
    /// The secondary desk.
    Desk2,
    /// The meeting area.
    Meeting,
    /// The break area.
    Break,
}

impl Zone {
    /// All zones, in canonical order.
    pub const ALL: [Self; 4] = [Self::Desk1, Self::Desk2, Self::Meeting, Self::Break];
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Desk1 => write!(f, "desk1"),
            Self::Desk2 => write!(f, "desk2"),
            Self::Meeting => write!(f, "meeting"),
            Self::Break => write!(f, "break"),
        }
    }
}

/// Seconds spent in each zone during one observation.
///
/// Zones absent from the serialized form default to 0, matching the
/// ingestion process, which only reports zones a person actually entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneTimes {
    /// Seconds at the primary desk.
    pub desk1: u64,
    /// Seconds at the secondary desk.
    pub desk2: u64,
    /// Seconds in the meeting area.
    pub meeting: u64,
    /// Seconds in the break area.
    #[serde(rename = "break")]
    pub break_area: u64,
}

impl ZoneTimes {
    /// Create zone times from explicit per-zone values.
    #[must_use]
    pub fn new(desk1: u64, desk2: u64, meeting: u64, break_area: u64) -> Self {
        Self {
            desk1,
            desk2,
            meeting,
            break_area,
        }
    }

    /// Get the seconds recorded for a single zone.
    #[must_use]
    pub fn get(&self, zone: Zone) -> u64 {
        match zone {
            Zone::Desk1 => self.desk1,
            Zone::Desk2 => self.desk2,
            Zone::Meeting => self.meeting,
            Zone::Break => self.break_area,
        }
    }

    /// Total seconds across all zones.
    #[must_use]
    pub fn total(&self) -> u64 {
        Zone::ALL.iter().map(|z| self.get(*z)).sum()
    }
}

/// One occupancy observation for one person at one point in time.
///
/// Records are immutable once created: the ingestion process appends them
/// and the aggregation layer only reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRecord {
    /// Unique identifier for this record (assigned by the storage layer).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,

    /// The person this observation belongs to. Opaque, grouped by exact
    /// string equality; no normalization is applied.
    pub person_id: String,

    /// When this observation was captured. Defaults to the time the record
    /// was created when the ingestion payload omits it.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    /// Seconds spent in each zone.
    #[serde(default)]
    pub zone_times: ZoneTimes,

    /// Movement counter for the observation window.
    #[serde(default)]
    pub movement_time: u64,
}

impl ZoneRecord {
    /// Create a new record stamped with the current time.
    #[must_use]
    pub fn new(person_id: impl Into<String>, zone_times: ZoneTimes, movement_time: u64) -> Self {
        Self {
            id: None,
            person_id: person_id.into(),
            timestamp: Utc::now(),
            zone_times,
            movement_time,
        }
    }

    /// Replace the timestamp, consuming the record.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Check the shape invariants.
    ///
    /// Numeric fields are non-negative by construction (`u64`), so the only
    /// invariant left to enforce is a non-empty `person_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] if `person_id` is empty.
    pub fn validate(&self) -> Result<()> {
        if self.person_id.is_empty() {
            return Err(Error::invalid_record("person_id is empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_zone_display() {
        assert_eq!(Zone::Desk1.to_string(), "desk1");
        assert_eq!(Zone::Desk2.to_string(), "desk2");
        assert_eq!(Zone::Meeting.to_string(), "meeting");
        assert_eq!(Zone::Break.to_string(), "break");
    }

    #[test]
    fn test_zone_all_covers_every_zone() {
        assert_eq!(Zone::ALL.len(), 4);
        assert_eq!(Zone::ALL[0], Zone::Desk1);
        assert_eq!(Zone::ALL[3], Zone::Break);
    }

    #[test]
    fn test_zone_times_default_is_zero() {
        let times = ZoneTimes::default();
        for zone in Zone::ALL {
            assert_eq!(times.get(zone), 0);
        }
        assert_eq!(times.total(), 0);
    }

    #[test]
    fn test_zone_times_get() {
        let times = ZoneTimes::new(100, 20, 30, 4);
        assert_eq!(times.get(Zone::Desk1), 100);
        assert_eq!(times.get(Zone::Desk2), 20);
        assert_eq!(times.get(Zone::Meeting), 30);
        assert_eq!(times.get(Zone::Break), 4);
    }

    #[test]
    fn test_zone_times_total() {
        let times = ZoneTimes::new(100, 20, 30, 4);
        assert_eq!(times.total(), 154);
    }

    #[test]
    fn test_zone_times_break_serializes_as_break() {
        let times = ZoneTimes::new(0, 0, 0, 42);
        let json = serde_json::to_value(&times).unwrap();
        assert_eq!(json["break"], 42);
        assert!(json.get("break_area").is_none());
    }

    #[test]
    fn test_zone_times_missing_fields_default_to_zero() {
        let times: ZoneTimes = serde_json::from_str(r#"{"desk1": 75}"#).unwrap();
        assert_eq!(times.desk1, 75);
        assert_eq!(times.desk2, 0);
        assert_eq!(times.meeting, 0);
        assert_eq!(times.break_area, 0);
    }

    #[test]
    fn test_record_new_stamps_now() {
        let before = Utc::now();
        let record = ZoneRecord::new("A1B2", ZoneTimes::new(10, 0, 0, 0), 3);
        let after = Utc::now();

        assert!(record.id.is_none());
        assert_eq!(record.person_id, "A1B2");
        assert_eq!(record.movement_time, 3);
        assert!(record.timestamp >= before && record.timestamp <= after);
    }

    #[test]
    fn test_record_with_timestamp() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let record = ZoneRecord::new("A1B2", ZoneTimes::default(), 0).with_timestamp(ts);
        assert_eq!(record.timestamp, ts);
    }

    #[test]
    fn test_record_validate_ok() {
        let record = ZoneRecord::new("A1B2", ZoneTimes::default(), 0);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_record_validate_empty_person_id() {
        let record = ZoneRecord::new("", ZoneTimes::default(), 0);
        let err = record.validate().unwrap_err();
        assert!(err.is_invalid_record());
    }

    #[test]
    fn test_record_deserialize_defaults_timestamp() {
        let before = Utc::now();
        let record: ZoneRecord = serde_json::from_str(
            r#"{"person_id": "K9Q3", "zone_times": {"desk1": 120}, "movement_time": 5}"#,
        )
        .unwrap();
        assert_eq!(record.person_id, "K9Q3");
        assert_eq!(record.zone_times.desk1, 120);
        assert!(record.timestamp >= before);
    }

    #[test]
    fn test_record_deserialize_rejects_negative_duration() {
        let result: std::result::Result<ZoneRecord, _> = serde_json::from_str(
            r#"{"person_id": "K9Q3", "zone_times": {"desk1": -5}, "movement_time": 0}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_record_serialization_roundtrip() {
        let record = ZoneRecord::new("A1B2", ZoneTimes::new(100, 0, 30, 7), 5);
        let json = serde_json::to_string(&record).unwrap();
        let parsed: ZoneRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, parsed);
        // id is None and must not appear on the wire
        assert!(!json.contains("\"id\""));
    }
}
