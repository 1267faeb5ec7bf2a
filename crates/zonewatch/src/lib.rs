//! `zonewatch` - Zone occupancy records and summaries for the workplace dashboard
//!
//! This library stores the occupancy records written by an external
//! tracking process and computes per-person and aggregate zone-time
//! summaries over them. The aggregation layer is pure and transport
//! agnostic; the `zwatch` binary is one consumer, the dashboard's HTTP
//! layer another.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod storage;

pub use aggregate::{PersonSummary, ZoneTotals};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{Zone, ZoneRecord, ZoneTimes};
pub use storage::{Storage, StorageStats};
