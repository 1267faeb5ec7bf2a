//! Storage layer for zonewatch.
//!
//! `SQLite`-based persistence for occupancy records. The store supplies
//! exactly the query shapes the aggregation layer's callers need ("fetch
//! all records", "fetch records for a given person"), the append path
//! used by the ingestion process, retention pruning, and statistics.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{ZoneRecord, ZoneTimes};

/// Storage engine for occupancy records.
///
/// Records are append-only: the ingestion process inserts them and the
/// aggregation layer reads them back. The only delete path is retention
/// pruning by age.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't
    /// exist. Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL keeps concurrent dashboard reads cheap while ingestion appends
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record, returning the assigned row id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] if the record fails validation,
    /// or a database error if the insert fails. Invalid records are never
    /// silently stored.
    pub fn insert(&self, record: &ZoneRecord) -> Result<i64> {
        record.validate()?;

        self.conn.execute(
            r"
            INSERT INTO records
                (person_id, timestamp, desk1_secs, desk2_secs, meeting_secs, break_secs, movement_time)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
            params![
                record.person_id,
                record.timestamp.to_rfc3339(),
                record.zone_times.desk1,
                record.zone_times.desk2,
                record.zone_times.meeting,
                record.zone_times.break_area,
                record.movement_time,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(person_id = %record.person_id, id, "Inserted record");
        Ok(id)
    }

    /// Fetch every record, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn fetch_all(&self) -> Result<Vec<ZoneRecord>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, person_id, timestamp, desk1_secs, desk2_secs, meeting_secs, break_secs, movement_time
            FROM records ORDER BY id ASC
            ",
        )?;

        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Fetch one person's records, ordered by ascending timestamp.
    ///
    /// Equal timestamps fall back to insertion order, matching the
    /// aggregation layer's stable-sort semantics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn fetch_for_person(&self, person_id: &str) -> Result<Vec<ZoneRecord>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, person_id, timestamp, desk1_secs, desk2_secs, meeting_secs, break_secs, movement_time
            FROM records WHERE person_id = ?1
            ORDER BY timestamp ASC, id ASC
            ",
        )?;

        let records = stmt
            .query_map([person_id], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// List the distinct person ids present in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn person_ids(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT person_id FROM records ORDER BY person_id ASC")?;

        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    /// Count total records in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Prune records older than the given duration.
    ///
    /// Returns the number of records deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn prune_older_than(&self, max_age: Duration) -> Result<usize> {
        let cutoff = (Utc::now() - max_age).to_rfc3339();

        let affected = self
            .conn
            .execute("DELETE FROM records WHERE timestamp < ?1", [cutoff])?;

        if affected > 0 {
            info!("Pruned {} old records", affected);
        }
        Ok(affected)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_records = self.count()?;

        let distinct_persons: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT person_id) FROM records",
            [],
            |row| row.get(0),
        )?;

        let oldest: Option<String> = self
            .conn
            .query_row(
                "SELECT timestamp FROM records ORDER BY timestamp ASC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        let newest: Option<String> = self
            .conn
            .query_row(
                "SELECT timestamp FROM records ORDER BY timestamp DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_records,
            distinct_persons,
            oldest_record: parse_stored_timestamp(oldest),
            newest_record: parse_stored_timestamp(newest),
            db_size_bytes,
        })
    }

    /// Convert a database row to a `ZoneRecord`.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<ZoneRecord> {
        let id: i64 = row.get(0)?;
        let person_id: String = row.get(1)?;
        let timestamp_str: String = row.get(2)?;
        let zone_times = ZoneTimes {
            desk1: row.get(3)?,
            desk2: row.get(4)?,
            meeting: row.get(5)?,
            break_area: row.get(6)?,
        };
        let movement_time: u64 = row.get(7)?;

        let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
            .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

        Ok(ZoneRecord {
            id: Some(id),
            person_id,
            timestamp,
            zone_times,
            movement_time,
        })
    }
}

fn parse_stored_timestamp(value: Option<String>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Total number of records stored.
    pub total_records: i64,
    /// Number of distinct tracked persons.
    pub distinct_persons: i64,
    /// Timestamp of the oldest record.
    pub oldest_record: Option<DateTime<Utc>>,
    /// Timestamp of the newest record.
    pub newest_record: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
