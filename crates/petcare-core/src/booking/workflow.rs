//! Appointment lifecycle operations.

use tracing::{info, warn};

use crate::models::{Account, Appointment, AppointmentStatus, Pet};
use crate::scheduling::{ConflictChecker, TimeRange};

use super::{AppointmentRequest, BookingError, BookingResult, DirectBooking, ManageAction, Scheduler};

/// Longest appointment assign-confirm accepts.
const MAX_DURATION_MINUTES: i64 = 24 * 60;

impl<'a> Scheduler<'a> {
    /// Book a CONFIRMED appointment into the acting vet's schedule.
    ///
    /// Without a clinic id the vet's default clinic is used, creating a
    /// personal clinic when needed.
    pub fn book_direct(&self, actor: &Account, booking: DirectBooking) -> BookingResult<Appointment> {
        self.require_vet(actor)?;
        let range = TimeRange::new(booking.start, booking.end)?;

        self.db.immediate(|_| {
            self.load_pet(&booking.pet_id)?;
            let clinic_id = match booking.clinic_id.as_deref() {
                Some(id) => {
                    self.load_clinic(id)?;
                    self.require_member(actor, id)?;
                    id.to_string()
                }
                None => self.ensure_personal_clinic_locked(&actor.id)?.id,
            };

            self.ensure_free(&actor.id, &clinic_id, &range, None)?;

            let mut appt = Appointment::new(
                clinic_id,
                Some(actor.id.clone()),
                booking.pet_id.clone(),
                range,
                AppointmentStatus::Confirmed,
            );
            appt.reason = booking.reason.clone();
            appt.notes = booking.notes.clone();
            self.db.insert_appointment(&appt)?;

            info!(appointment_id = %appt.id, vet_id = %actor.id, start = %appt.starts_at, "Booked appointment");
            Ok(appt)
        })
    }

    /// Record an owner's request as PENDING_APPROVAL.
    ///
    /// The appointment lasts the configured request length. A request naming
    /// only a vet lands in that vet's default clinic. A request with a vet is
    /// checked for conflicts; an unassigned one never conflicts.
    pub fn request_appointment(
        &self,
        actor: &Account,
        request: AppointmentRequest,
    ) -> BookingResult<Appointment> {
        self.require_owner(actor)?;
        let range = TimeRange::starting_at(request.start, self.policy.request_minutes)?;

        self.db.immediate(|_| {
            let pet = self.load_pet(&request.pet_id)?;
            if !pet.is_owned_by(&actor.id) {
                return Err(BookingError::Forbidden("pet belongs to another owner".into()));
            }

            let clinic_id = match (request.clinic_id.as_deref(), request.vet_id.as_deref()) {
                (None, None) => {
                    return Err(BookingError::Validation(
                        "either clinicId or vetId is required".into(),
                    ))
                }
                (None, Some(vet_id)) => self.ensure_personal_clinic_locked(vet_id)?.id,
                (Some(clinic_id), vet_id) => {
                    self.load_clinic(clinic_id)?;
                    if let Some(vet_id) = vet_id {
                        self.require_assignable(vet_id, clinic_id)?;
                    }
                    clinic_id.to_string()
                }
            };

            if let Some(vet_id) = request.vet_id.as_deref() {
                self.ensure_free(vet_id, &clinic_id, &range, None)?;
            }

            let mut appt = Appointment::new(
                clinic_id,
                request.vet_id.clone(),
                pet.id,
                range,
                AppointmentStatus::PendingApproval,
            );
            appt.reason = request.reason.clone();
            self.db.insert_appointment(&appt)?;

            info!(appointment_id = %appt.id, owner_id = %actor.id, clinic_id = %appt.clinic_id, "Appointment requested");
            Ok(appt)
        })
    }

    /// Approve, reject or reassign an appointment on behalf of its clinic.
    pub fn manage(
        &self,
        actor: &Account,
        appointment_id: &str,
        action: ManageAction,
    ) -> BookingResult<Appointment> {
        self.require_vet(actor)?;

        self.db.immediate(|_| {
            let mut appt = self.load_appointment(appointment_id)?;

            match action {
                ManageAction::Approve => {
                    self.require_member(actor, &appt.clinic_id)?;
                    require_pending(&appt, AppointmentStatus::Confirmed)?;
                    if appt.vet_id.is_none() {
                        self.ensure_free(&actor.id, &appt.clinic_id, &appt.range(), Some(&appt.id))?;
                        appt.vet_id = Some(actor.id.clone());
                    }
                    appt.status = AppointmentStatus::Confirmed;
                }
                ManageAction::Reject => {
                    self.require_member(actor, &appt.clinic_id)?;
                    if !appt.status.can_transition_to(AppointmentStatus::Cancelled) {
                        return Err(BookingError::InvalidTransition {
                            from: appt.status,
                            to: AppointmentStatus::Cancelled,
                        });
                    }
                    appt.status = AppointmentStatus::Cancelled;
                }
                ManageAction::Assign { vet_id } => {
                    self.require_manager(actor, &appt.clinic_id)?;
                    if appt.status.is_terminal() {
                        return Err(BookingError::Validation(format!(
                            "cannot reassign a {} appointment",
                            appt.status
                        )));
                    }
                    self.require_assignable(&vet_id, &appt.clinic_id)?;
                    self.ensure_free(&vet_id, &appt.clinic_id, &appt.range(), Some(&appt.id))?;
                    appt.vet_id = Some(vet_id);
                }
            }

            appt.touch();
            self.db.update_appointment(&appt)?;
            info!(appointment_id = %appt.id, status = %appt.status, vet_id = ?appt.vet_id, "Appointment managed");
            Ok(appt)
        })
    }

    /// Move an appointment along its lifecycle.
    ///
    /// Allowed for the assigned vet and for OWNER/ADMIN members of the clinic.
    pub fn update_status(
        &self,
        actor: &Account,
        appointment_id: &str,
        status: AppointmentStatus,
    ) -> BookingResult<Appointment> {
        self.require_vet(actor)?;

        self.db.immediate(|_| {
            let mut appt = self.load_appointment(appointment_id)?;
            if !appt.is_assigned_to(&actor.id) {
                self.require_manager(actor, &appt.clinic_id)?;
            }

            if !appt.status.can_transition_to(status) {
                warn!(appointment_id, from = %appt.status, to = %status, "Rejected status change");
                return Err(BookingError::InvalidTransition {
                    from: appt.status,
                    to: status,
                });
            }
            if status == AppointmentStatus::Confirmed && appt.vet_id.is_none() {
                return Err(BookingError::Validation(
                    "assign a vet before confirming".into(),
                ));
            }

            let previous = appt.status;
            appt.status = status;
            appt.touch();
            self.db.update_appointment(&appt)?;
            info!(appointment_id, from = %previous, to = %status, "Status changed");
            Ok(appt)
        })
    }

    /// Assign a vet to a pending request, set its length and confirm it.
    /// Requires OWNER or ADMIN.
    pub fn assign_and_confirm(
        &self,
        actor: &Account,
        appointment_id: &str,
        vet_id: &str,
        duration_minutes: i64,
    ) -> BookingResult<Appointment> {
        self.require_vet(actor)?;
        if !(1..=MAX_DURATION_MINUTES).contains(&duration_minutes) {
            return Err(BookingError::Validation(format!(
                "durationMinutes must be between 1 and {}",
                MAX_DURATION_MINUTES
            )));
        }

        self.db.immediate(|_| {
            let mut appt = self.load_appointment(appointment_id)?;
            self.require_manager(actor, &appt.clinic_id)?;
            require_pending(&appt, AppointmentStatus::Confirmed)?;
            self.require_assignable(vet_id, &appt.clinic_id)?;

            let range = TimeRange::starting_at(appt.starts_at, duration_minutes)?;
            self.ensure_free(vet_id, &appt.clinic_id, &range, Some(&appt.id))?;

            appt.vet_id = Some(vet_id.to_string());
            appt.ends_at = range.end();
            appt.status = AppointmentStatus::Confirmed;
            appt.touch();
            self.db.update_appointment(&appt)?;

            info!(appointment_id, vet_id, minutes = duration_minutes, "Assigned and confirmed");
            Ok(appt)
        })
    }

    /// Fail with `Conflict` if the vet is busy in the clinic during `range`.
    fn ensure_free(
        &self,
        vet_id: &str,
        clinic_id: &str,
        range: &TimeRange,
        ignore_id: Option<&str>,
    ) -> BookingResult<()> {
        let conflicts = ConflictChecker::new(self.db).conflicts_for(vet_id, clinic_id, range, ignore_id)?;
        match conflicts.first() {
            None => Ok(()),
            Some(existing) => {
                warn!(vet_id, clinic_id, existing = %existing.id, "Booking conflict");
                Err(BookingError::Conflict(format!(
                    "vet already has an appointment from {} to {}",
                    existing.starts_at.to_rfc3339(),
                    existing.ends_at.to_rfc3339()
                )))
            }
        }
    }

    fn load_pet(&self, pet_id: &str) -> BookingResult<Pet> {
        self.db
            .get_pet(pet_id)?
            .ok_or_else(|| BookingError::NotFound(format!("Pet {}", pet_id)))
    }

    pub(super) fn load_appointment(&self, appointment_id: &str) -> BookingResult<Appointment> {
        self.db
            .get_appointment(appointment_id)?
            .ok_or_else(|| BookingError::NotFound(format!("Appointment {}", appointment_id)))
    }
}

/// APPROVE and assign-confirm only act on pending requests.
fn require_pending(appt: &Appointment, to: AppointmentStatus) -> BookingResult<()> {
    if appt.status == AppointmentStatus::PendingApproval {
        Ok(())
    } else {
        Err(BookingError::InvalidTransition {
            from: appt.status,
            to,
        })
    }
}
