//! Error types for zonewatch.
//!
//! This module defines all error types used throughout the zonewatch crate.
//! The two domain errors (`NotFound`, `InvalidRecord`) are recoverable and
//! surfaced to callers; the rest wrap storage, configuration, and I/O
//! failures with enough context to diagnose them.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for zonewatch operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Domain Errors ===
    /// No record matches the requested person.
    #[error("no records found for person '{person_id}'")]
    NotFound {
        /// The person id that matched nothing.
        person_id: String,
    },

    /// A record violates the shape invariants.
    #[error("invalid record: {message}")]
    InvalidRecord {
        /// Description of the violated invariant.
        message: String,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for zonewatch operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a not-found error for the given person.
    #[must_use]
    pub fn not_found(person_id: impl Into<String>) -> Self {
        Self::NotFound {
            person_id: person_id.into(),
        }
    }

    /// Create an invalid-record error.
    #[must_use]
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }

    /// Check if this error means the requested person has no records.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a record shape violation.
    #[must_use]
    pub fn is_invalid_record(&self) -> bool {
        matches!(self, Self::InvalidRecord { .. })
    }
}
