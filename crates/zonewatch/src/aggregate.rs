//! Zone-time aggregation.
//!
//! This module is the computational core of zonewatch: a pure, stateless
//! function set that folds occupancy records into per-person totals. It
//! performs no I/O and never mutates its input; callers fetch records from
//! storage (or anywhere else) and hand them in as a slice.
//!
//! All accumulation is integer (`u64`), so totals are exact for the
//! domain. Grouping is by exact `person_id` string equality. There is no
//! windowing, decay, or time-bucketing: totals are all-time sums over
//! whatever record set is supplied.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::{Zone, ZoneRecord};

/// Aggregated zone seconds and movement across a set of records.
///
/// Purely derived; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneTotals {
    /// Total seconds at the primary desk.
    pub desk1: u64,
    /// Total seconds at the secondary desk.
    pub desk2: u64,
    /// Total seconds in the meeting area.
    pub meeting: u64,
    /// Total seconds in the break area.
    #[serde(rename = "break")]
    pub break_area: u64,
    /// Total movement across all records.
    pub movement_time: u64,
}

impl ZoneTotals {
    /// Fold one record into the totals.
    pub fn accumulate(&mut self, record: &ZoneRecord) {
        self.desk1 += record.zone_times.desk1;
        self.desk2 += record.zone_times.desk2;
        self.meeting += record.zone_times.meeting;
        self.break_area += record.zone_times.break_area;
        self.movement_time += record.movement_time;
    }

    /// Get the total seconds for a single zone.
    #[must_use]
    pub fn get(&self, zone: Zone) -> u64 {
        match zone {
            Zone::Desk1 => self.desk1,
            Zone::Desk2 => self.desk2,
            Zone::Meeting => self.meeting,
            Zone::Break => self.break_area,
        }
    }

    /// Total occupied seconds across all zones (excludes movement).
    #[must_use]
    pub fn occupied(&self) -> u64 {
        Zone::ALL.iter().map(|z| self.get(*z)).sum()
    }
}

/// The aggregate view of one person: totals plus their full history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSummary {
    /// The person these records belong to.
    pub person_id: String,
    /// Totals over every record in `entries`.
    pub totals: ZoneTotals,
    /// The records that produced `totals`.
    pub entries: Vec<ZoneRecord>,
}

/// Summarize every person present in `records`.
///
/// Groups records by `person_id` and sums the four zone fields and the
/// movement counter per group. The result carries one [`PersonSummary`]
/// per distinct person, ordered by `person_id`; `entries` within each
/// summary preserve the input encounter order.
///
/// Empty input yields an empty vector.
///
/// # Errors
///
/// Returns [`Error::InvalidRecord`] if any record in the batch fails
/// validation; no partial output is produced.
pub fn summarize_all(records: &[ZoneRecord]) -> Result<Vec<PersonSummary>> {
    validate_batch(records)?;

    let mut groups: BTreeMap<&str, PersonSummary> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.person_id.as_str())
            .or_insert_with(|| PersonSummary {
                person_id: record.person_id.clone(),
                totals: ZoneTotals::default(),
                entries: Vec::new(),
            })
            .fold(record);
    }

    Ok(groups.into_values().collect())
}

/// Summarize a single person's records.
///
/// Filters `records` to those matching `person_id`, orders the subset by
/// ascending timestamp (stable: records with equal timestamps keep their
/// relative input order), and computes totals over exactly that subset.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when no record matches `person_id`, and
/// [`Error::InvalidRecord`] if any record in the batch fails validation.
pub fn summarize_by_person(records: &[ZoneRecord], person_id: &str) -> Result<PersonSummary> {
    validate_batch(records)?;

    let mut entries: Vec<ZoneRecord> = records
        .iter()
        .filter(|r| r.person_id == person_id)
        .cloned()
        .collect();

    if entries.is_empty() {
        return Err(Error::not_found(person_id));
    }

    // Vec::sort_by_key is stable, which preserves input order on ties.
    entries.sort_by_key(|r| r.timestamp);

    let mut totals = ZoneTotals::default();
    for entry in &entries {
        totals.accumulate(entry);
    }

    Ok(PersonSummary {
        person_id: person_id.to_string(),
        totals,
        entries,
    })
}

/// Summarize every person as a bare `person_id → totals` mapping.
///
/// Same grouping as [`summarize_all`] but without the per-person entries;
/// intended for lightweight bulk summaries. Empty input yields an empty
/// mapping.
///
/// # Errors
///
/// Returns [`Error::InvalidRecord`] if any record in the batch fails
/// validation.
pub fn flatten_to_mapping(records: &[ZoneRecord]) -> Result<BTreeMap<String, ZoneTotals>> {
    validate_batch(records)?;

    let mut mapping: BTreeMap<String, ZoneTotals> = BTreeMap::new();
    for record in records {
        mapping
            .entry(record.person_id.clone())
            .or_default()
            .accumulate(record);
    }

    Ok(mapping)
}

/// Validate every record in the batch before aggregating.
///
/// Rejecting the whole batch (rather than skipping bad records) keeps the
/// pure operations deterministic: either every record counted, or none did.
fn validate_batch(records: &[ZoneRecord]) -> Result<()> {
    for record in records {
        record.validate()?;
    }
    Ok(())
}

impl PersonSummary {
    fn fold(&mut self, record: &ZoneRecord) {
        self.totals.accumulate(record);
        self.entries.push(record.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ZoneTimes;
    use chrono::{TimeZone, Utc};

    fn record(person: &str, times: ZoneTimes, movement: u64, ts_secs: i64) -> ZoneRecord {
        ZoneRecord::new(person, times, movement)
            .with_timestamp(Utc.timestamp_opt(ts_secs, 0).unwrap())
    }

    /// The fixture from the dashboard's two-person scenario.
    fn scenario() -> Vec<ZoneRecord> {
        vec![
            record("A", ZoneTimes::new(100, 0, 0, 0), 5, 1),
            record("A", ZoneTimes::new(50, 10, 0, 0), 2, 2),
            record("B", ZoneTimes::new(0, 0, 30, 0), 1, 1),
        ]
    }

    #[test]
    fn test_summarize_all_scenario() {
        let summaries = summarize_all(&scenario()).unwrap();
        assert_eq!(summaries.len(), 2);

        let a = &summaries[0];
        assert_eq!(a.person_id, "A");
        assert_eq!(
            a.totals,
            ZoneTotals {
                desk1: 150,
                desk2: 10,
                meeting: 0,
                break_area: 0,
                movement_time: 7,
            }
        );
        assert_eq!(a.entries.len(), 2);

        let b = &summaries[1];
        assert_eq!(b.person_id, "B");
        assert_eq!(
            b.totals,
            ZoneTotals {
                desk1: 0,
                desk2: 0,
                meeting: 30,
                break_area: 0,
                movement_time: 1,
            }
        );
        assert_eq!(b.entries.len(), 1);
    }

    #[test]
    fn test_summarize_all_empty_input() {
        let summaries = summarize_all(&[]).unwrap();
        assert!(summaries.is_empty());
    }

    #[test]
    fn test_summarize_all_conservation_of_totals() {
        let records = scenario();
        let summaries = summarize_all(&records).unwrap();

        let grand: u64 = summaries.iter().map(|s| s.totals.occupied()).sum();
        let expected: u64 = records.iter().map(|r| r.zone_times.total()).sum();
        assert_eq!(grand, expected);

        let movement: u64 = summaries.iter().map(|s| s.totals.movement_time).sum();
        let expected_movement: u64 = records.iter().map(|r| r.movement_time).sum();
        assert_eq!(movement, expected_movement);
    }

    #[test]
    fn test_summarize_all_entries_preserve_encounter_order() {
        let records = vec![
            record("A", ZoneTimes::new(1, 0, 0, 0), 0, 9),
            record("A", ZoneTimes::new(2, 0, 0, 0), 0, 3),
        ];
        let summaries = summarize_all(&records).unwrap();
        // Grouping does not reorder entries, even when timestamps are
        // out of order.
        assert_eq!(summaries[0].entries[0].zone_times.desk1, 1);
        assert_eq!(summaries[0].entries[1].zone_times.desk1, 2);
    }

    #[test]
    fn test_summarize_all_rejects_invalid_batch() {
        let records = vec![
            record("A", ZoneTimes::new(1, 0, 0, 0), 0, 1),
            record("", ZoneTimes::new(2, 0, 0, 0), 0, 2),
        ];
        let err = summarize_all(&records).unwrap_err();
        assert!(err.is_invalid_record());
    }

    #[test]
    fn test_summarize_by_person_scenario() {
        let summary = summarize_by_person(&scenario(), "A").unwrap();
        assert_eq!(summary.person_id, "A");
        assert_eq!(summary.totals.desk1, 150);
        assert_eq!(summary.totals.desk2, 10);
        assert_eq!(summary.totals.movement_time, 7);
        assert_eq!(summary.entries.len(), 2);
        assert_eq!(summary.entries[0].timestamp.timestamp(), 1);
        assert_eq!(summary.entries[1].timestamp.timestamp(), 2);
    }

    #[test]
    fn test_summarize_by_person_sorts_by_timestamp() {
        let records = vec![
            record("A", ZoneTimes::new(3, 0, 0, 0), 0, 30),
            record("A", ZoneTimes::new(1, 0, 0, 0), 0, 10),
            record("A", ZoneTimes::new(2, 0, 0, 0), 0, 20),
        ];
        let summary = summarize_by_person(&records, "A").unwrap();
        let desk1: Vec<u64> = summary.entries.iter().map(|e| e.zone_times.desk1).collect();
        assert_eq!(desk1, vec![1, 2, 3]);
    }

    #[test]
    fn test_summarize_by_person_equal_timestamps_keep_input_order() {
        let records = vec![
            record("A", ZoneTimes::new(1, 0, 0, 0), 0, 5),
            record("A", ZoneTimes::new(2, 0, 0, 0), 0, 5),
            record("A", ZoneTimes::new(3, 0, 0, 0), 0, 5),
        ];
        let summary = summarize_by_person(&records, "A").unwrap();
        let desk1: Vec<u64> = summary.entries.iter().map(|e| e.zone_times.desk1).collect();
        assert_eq!(desk1, vec![1, 2, 3]);
    }

    #[test]
    fn test_summarize_by_person_not_found() {
        let err = summarize_by_person(&scenario(), "C").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains('C'));
    }

    #[test]
    fn test_summarize_by_person_not_found_on_empty_input() {
        let err = summarize_by_person(&[], "A").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_summarize_by_person_ignores_other_persons() {
        let summary = summarize_by_person(&scenario(), "B").unwrap();
        assert_eq!(summary.totals.meeting, 30);
        assert_eq!(summary.totals.desk1, 0);
        assert_eq!(summary.entries.len(), 1);
    }

    #[test]
    fn test_flatten_to_mapping_scenario() {
        let mapping = flatten_to_mapping(&scenario()).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping["A"].desk1, 150);
        assert_eq!(mapping["A"].movement_time, 7);
        assert_eq!(mapping["B"].meeting, 30);
    }

    #[test]
    fn test_flatten_to_mapping_empty_input() {
        let mapping = flatten_to_mapping(&[]).unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_flatten_matches_summarize_all() {
        let records = scenario();
        let summaries = summarize_all(&records).unwrap();
        let mapping = flatten_to_mapping(&records).unwrap();

        assert_eq!(summaries.len(), mapping.len());
        for summary in summaries {
            assert_eq!(mapping[&summary.person_id], summary.totals);
        }
    }

    #[test]
    fn test_idempotence_input_not_mutated() {
        let records = scenario();
        let snapshot = records.clone();

        let first = summarize_all(&records).unwrap();
        let second = summarize_all(&records).unwrap();

        assert_eq!(first, second);
        assert_eq!(records, snapshot);

        let by_person_first = summarize_by_person(&records, "A").unwrap();
        let by_person_second = summarize_by_person(&records, "A").unwrap();
        assert_eq!(by_person_first, by_person_second);
        assert_eq!(records, snapshot);
    }

    #[test]
    fn test_grouping_is_exact_string_equality() {
        let records = vec![
            record("a", ZoneTimes::new(1, 0, 0, 0), 0, 1),
            record("A", ZoneTimes::new(2, 0, 0, 0), 0, 1),
            record(" A", ZoneTimes::new(3, 0, 0, 0), 0, 1),
        ];
        let mapping = flatten_to_mapping(&records).unwrap();
        // No case folding, no trimming: three distinct groups.
        assert_eq!(mapping.len(), 3);
    }

    #[test]
    fn test_zone_totals_accumulate() {
        let mut totals = ZoneTotals::default();
        totals.accumulate(&record("A", ZoneTimes::new(10, 20, 30, 40), 5, 1));
        totals.accumulate(&record("A", ZoneTimes::new(1, 2, 3, 4), 1, 2));

        assert_eq!(totals.get(Zone::Desk1), 11);
        assert_eq!(totals.get(Zone::Desk2), 22);
        assert_eq!(totals.get(Zone::Meeting), 33);
        assert_eq!(totals.get(Zone::Break), 44);
        assert_eq!(totals.movement_time, 6);
        assert_eq!(totals.occupied(), 110);
    }

    #[test]
    fn test_zone_totals_serializes_break_field() {
        let totals = ZoneTotals {
            break_area: 9,
            ..ZoneTotals::default()
        };
        let json = serde_json::to_value(totals).unwrap();
        assert_eq!(json["break"], 9);
        assert_eq!(json["movement_time"], 0);
    }

    #[test]
    fn test_summary_serializes_dashboard_shape() {
        let summaries = summarize_all(&scenario()).unwrap();
        let json = serde_json::to_value(&summaries).unwrap();
        assert_eq!(json[0]["person_id"], "A");
        assert_eq!(json[0]["totals"]["desk1"], 150);
        assert!(json[0]["entries"].is_array());
    }
}
