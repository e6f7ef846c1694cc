//! Typed failures for the engine.
//!
//! Placement and decision logic never fail on a valid snapshot; the only
//! error sources are snapshot construction and the schedule store.

use chrono::NaiveDate;
use thiserror::Error;

/// A calendar feed that cannot be turned into a snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("holiday range '{name}' ends before it starts ({start} > {end})")]
    InvertedRange {
        name: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("holiday range starting {start} has an empty name")]
    UnnamedHoliday { start: NaiveDate },

    #[error("solar term on {date} has an empty name")]
    UnnamedSolarTerm { date: NaiveDate },

    #[error("snapshot for {expected} cannot be followed by {found}")]
    YearMismatch { expected: i32, found: i32 },

    #[error("year {0} has no following year")]
    NoFollowingYear(i32),

    #[error("invalid period id '{0}' (expected YYYY-MM)")]
    InvalidPeriod(String),
}

/// Backing storage failures, propagated unchanged to the caller.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("schedule store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("schedule store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
