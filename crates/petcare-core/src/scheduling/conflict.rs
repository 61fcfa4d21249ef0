//! Appointment conflict detection.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::db::Database;
use crate::models::{Appointment, AppointmentStatus};

use super::{SchedulingResult, TimeRange};

/// Checks proposed bookings against a vet's existing appointments in a clinic.
pub struct ConflictChecker<'a> {
    db: &'a Database,
}

impl<'a> ConflictChecker<'a> {
    /// Create a new conflict checker.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Whether `[proposed_start, proposed_end)` overlaps any appointment of
    /// the vet in the clinic whose status is not in `exclude_statuses`.
    ///
    /// Returns `InvalidRange` if `proposed_start >= proposed_end`.
    pub fn has_conflict(
        &self,
        vet_id: &str,
        clinic_id: &str,
        proposed_start: DateTime<Utc>,
        proposed_end: DateTime<Utc>,
        exclude_statuses: &[AppointmentStatus],
    ) -> SchedulingResult<bool> {
        let range = TimeRange::new(proposed_start, proposed_end)?;
        let conflicts = self.find_conflicts(vet_id, clinic_id, &range, exclude_statuses, None)?;
        Ok(!conflicts.is_empty())
    }

    /// Same as [`has_conflict`](Self::has_conflict) with the default
    /// exclusions (CANCELLED, NO_SHOW), skipping appointment `ignore_id`.
    pub fn conflicts_for(
        &self,
        vet_id: &str,
        clinic_id: &str,
        range: &TimeRange,
        ignore_id: Option<&str>,
    ) -> SchedulingResult<Vec<Appointment>> {
        self.find_conflicts(vet_id, clinic_id, range, AppointmentStatus::RELEASED, ignore_id)
    }

    /// All overlapping appointments, in start order.
    pub fn find_conflicts(
        &self,
        vet_id: &str,
        clinic_id: &str,
        range: &TimeRange,
        exclude_statuses: &[AppointmentStatus],
        ignore_id: Option<&str>,
    ) -> SchedulingResult<Vec<Appointment>> {
        let existing = self.db.list_vet_clinic_appointments(vet_id, clinic_id)?;

        let conflicts: Vec<Appointment> = existing
            .into_iter()
            .filter(|appt| !exclude_statuses.contains(&appt.status))
            .filter(|appt| ignore_id != Some(appt.id.as_str()))
            .filter(|appt| appt.range().overlaps(range))
            .collect();

        debug!(
            vet_id,
            clinic_id,
            start = %range.start(),
            end = %range.end(),
            conflicts = conflicts.len(),
            "Conflict check"
        );

        Ok(conflicts)
    }
}
