//! Booking workflow: direct bookings, owner requests, approval and
//! assignment, status changes, and the clinic/pet records they depend on.
//!
//! Every mutation runs inside [`Database::immediate`], so the conflict check
//! and the write that follows it are one atomic unit. The overlap triggers in
//! the schema back this up at the storage layer.

mod clinics;
mod queries;
mod requests;
mod workflow;

pub use requests::*;

use thiserror::Error;
use tracing::warn;

use crate::access;
use crate::db::{Database, DbError};
use crate::models::{Account, AppointmentStatus, MemberRole};
use crate::scheduling::{SchedulingError, WorkWindow};

/// Booking errors.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Storage error: {0}")]
    Storage(DbError),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Scheduling conflict: {0}")]
    Conflict(String),

    #[error("Cannot change appointment status from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
}

pub type BookingResult<T> = Result<T, BookingError>;

impl From<DbError> for BookingError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Overlap(vet_id) => BookingError::Conflict(format!(
                "vet {} already has an appointment in this time range",
                vet_id
            )),
            other => BookingError::Storage(other),
        }
    }
}

impl From<SchedulingError> for BookingError {
    fn from(e: SchedulingError) -> Self {
        match e {
            SchedulingError::Database(db) => db.into(),
            SchedulingError::InvalidRange { .. }
            | SchedulingError::InvalidWindow(_)
            | SchedulingError::OutOfRange(_) => {
                BookingError::Validation(e.to_string())
            }
        }
    }
}

/// Tunables for the booking workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPolicy {
    /// Working window used for slot generation
    pub window: WorkWindow,
    /// Fixed length of owner-initiated requests, in minutes
    pub request_minutes: i64,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            window: WorkWindow::default(),
            request_minutes: 30,
        }
    }
}

/// Entry point for all scheduling operations.
pub struct Scheduler<'a> {
    db: &'a Database,
    policy: BookingPolicy,
}

impl<'a> Scheduler<'a> {
    /// Create a scheduler with the default policy.
    pub fn new(db: &'a Database) -> Self {
        Self::with_policy(db, BookingPolicy::default())
    }

    pub fn with_policy(db: &'a Database, policy: BookingPolicy) -> Self {
        Self { db, policy }
    }

    pub fn policy(&self) -> &BookingPolicy {
        &self.policy
    }

    fn require_vet(&self, actor: &Account) -> BookingResult<()> {
        if actor.is_vet() {
            Ok(())
        } else {
            Err(BookingError::Forbidden("only vets can perform this action".into()))
        }
    }

    fn require_owner(&self, actor: &Account) -> BookingResult<()> {
        if actor.is_owner() {
            Ok(())
        } else {
            Err(BookingError::Forbidden("only pet owners can perform this action".into()))
        }
    }

    fn require_member(&self, actor: &Account, clinic_id: &str) -> BookingResult<()> {
        if access::is_active_member(self.db, &actor.id, clinic_id)? {
            return Ok(());
        }
        warn!(vet_id = %actor.id, clinic_id, "Rejected: not an active clinic member");
        Err(BookingError::Forbidden("not an active member of this clinic".into()))
    }

    fn require_manager(&self, actor: &Account, clinic_id: &str) -> BookingResult<()> {
        if access::has_clinic_role(self.db, &actor.id, clinic_id, MemberRole::MANAGERS)? {
            return Ok(());
        }
        warn!(vet_id = %actor.id, clinic_id, "Rejected: requires OWNER or ADMIN role");
        Err(BookingError::Forbidden("requires OWNER or ADMIN role in this clinic".into()))
    }

    /// Load a vet account, failing with `NotFound` for unknown or non-vet ids.
    fn load_vet(&self, vet_id: &str) -> BookingResult<Account> {
        self.db
            .get_account(vet_id)?
            .filter(Account::is_vet)
            .ok_or_else(|| BookingError::NotFound(format!("Vet {}", vet_id)))
    }

    /// Target of an assignment must be an ACTIVE member of the clinic.
    fn require_assignable(&self, vet_id: &str, clinic_id: &str) -> BookingResult<()> {
        self.load_vet(vet_id)?;
        if access::is_active_member(self.db, vet_id, clinic_id)? {
            Ok(())
        } else {
            Err(BookingError::Validation(format!(
                "vet {} is not an active member of this clinic",
                vet_id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_maps_to_conflict() {
        let err: BookingError = DbError::Overlap("vet-1".into()).into();
        assert!(matches!(err, BookingError::Conflict(_)));

        let err: BookingError = DbError::NotFound("x".into()).into();
        assert!(matches!(err, BookingError::Storage(_)));
    }

    #[test]
    fn test_invalid_range_maps_to_validation() {
        let now = chrono::Utc::now();
        let err: BookingError = SchedulingError::InvalidRange { start: now, end: now }.into();
        assert!(matches!(err, BookingError::Validation(_)));
    }

    #[test]
    fn test_default_policy() {
        let policy = BookingPolicy::default();
        assert_eq!(policy.request_minutes, 30);
        assert_eq!(policy.window.slot_minutes(), 30);
    }
}
