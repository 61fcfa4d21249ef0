//! Scheduling primitives: time ranges, conflict detection, slot generation.
//!
//! All intervals are half-open `[start, end)`. Two intervals overlap iff
//! `s1 < e2 && e1 > s2`, so back-to-back bookings never conflict.

mod conflict;
mod range;
mod slots;

pub use conflict::*;
pub use range::*;
pub use slots::*;

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

/// Scheduling errors.
#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),

    #[error("Invalid time range: start {start} must be before end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid working window: {0}")]
    InvalidWindow(String),

    #[error("Time out of supported range: {0}")]
    OutOfRange(String),
}

pub type SchedulingResult<T> = Result<T, SchedulingError>;

/// `start + minutes`, or `OutOfRange` when the result is not representable.
pub fn add_minutes(start: DateTime<Utc>, minutes: i64) -> SchedulingResult<DateTime<Utc>> {
    TimeDelta::try_minutes(minutes)
        .and_then(|delta| start.checked_add_signed(delta))
        .ok_or_else(|| SchedulingError::OutOfRange(format!("{} + {} minutes", start, minutes)))
}

/// `start + days`, or `OutOfRange` when the result is not representable.
pub fn add_days(start: DateTime<Utc>, days: i64) -> SchedulingResult<DateTime<Utc>> {
    TimeDelta::try_days(days)
        .and_then(|delta| start.checked_add_signed(delta))
        .ok_or_else(|| SchedulingError::OutOfRange(format!("{} + {} days", start, days)))
}
