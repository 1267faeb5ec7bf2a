//! `SQLite` schema definitions for zonewatch.
//!
//! SQL statements for creating and managing the records table and its
//! supporting indexes.

/// SQL statement to create the records table.
///
/// Zone durations are whole seconds; one column per zone keeps the shape
/// closed at the schema level, mirroring the record type.
pub const CREATE_RECORDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    desk1_secs INTEGER NOT NULL DEFAULT 0,
    desk2_secs INTEGER NOT NULL DEFAULT 0,
    meeting_secs INTEGER NOT NULL DEFAULT 0,
    break_secs INTEGER NOT NULL DEFAULT 0,
    movement_time INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create an index on `person_id` for per-person queries.
pub const CREATE_PERSON_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_records_person ON records(person_id)
";

/// SQL statement to create an index on timestamp for ordered history and
/// retention pruning.
pub const CREATE_TIMESTAMP_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_records_timestamp ON records(timestamp)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_RECORDS_TABLE,
    CREATE_PERSON_INDEX,
    CREATE_TIMESTAMP_INDEX,
    CREATE_METADATA_TABLE,
];
