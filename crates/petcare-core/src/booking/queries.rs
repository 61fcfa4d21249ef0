//! Read-side operations: calendars, owner history, free slots.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::access;
use crate::models::{Account, Appointment};
use crate::scheduling::{add_days, SlotFinder, TimeRange};

use super::{BookingError, BookingResult, ScheduleQuery, Scheduler};

/// Default calendar span when the query gives no end.
const DEFAULT_SPAN_DAYS: i64 = 7;

impl<'a> Scheduler<'a> {
    /// The acting vet's calendar over `[start, end)`.
    ///
    /// With a clinic id: every appointment of that clinic (ACTIVE members
    /// only). Without: appointments assigned to the vet plus those of any
    /// clinic where the vet is an ACTIVE member.
    pub fn schedule(
        &self,
        actor: &Account,
        query: ScheduleQuery,
        now: DateTime<Utc>,
    ) -> BookingResult<Vec<Appointment>> {
        self.require_vet(actor)?;

        let start = query.start.unwrap_or_else(|| start_of_day(now));
        let end = match query.end {
            Some(end) => end,
            None => add_days(start, DEFAULT_SPAN_DAYS)?,
        };
        let range = TimeRange::new(start, end)?;

        match query.clinic_id.as_deref() {
            Some(clinic_id) => {
                self.load_clinic(clinic_id)?;
                self.require_member(actor, clinic_id)?;
                Ok(self
                    .db
                    .list_clinic_appointments_between(clinic_id, range.start(), range.end())?)
            }
            None => Ok(self
                .db
                .list_visible_appointments_between(&actor.id, range.start(), range.end())?),
        }
    }

    /// Every appointment of the acting owner's pets, newest first.
    pub fn owner_appointments(&self, actor: &Account) -> BookingResult<Vec<Appointment>> {
        self.require_owner(actor)?;
        Ok(self.db.list_owner_appointments(&actor.id)?)
    }

    /// Free `HH:mm` slots for a vet on `date`.
    pub fn available_slots(
        &self,
        vet_id: &str,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> BookingResult<Vec<String>> {
        self.load_vet(vet_id)?;
        Ok(SlotFinder::new(self.db, self.policy.window).generate_slots(vet_id, date, now)?)
    }

    /// A single appointment, visible to its owner, its assigned vet and the
    /// clinic's ACTIVE members.
    pub fn appointment(&self, actor: &Account, appointment_id: &str) -> BookingResult<Appointment> {
        let appt = self.load_appointment(appointment_id)?;
        let visible = if actor.is_owner() {
            self.db
                .get_pet(&appt.pet_id)?
                .map(|pet| pet.is_owned_by(&actor.id))
                .unwrap_or(false)
        } else {
            appt.is_assigned_to(&actor.id)
                || access::is_active_member(self.db, &actor.id, &appt.clinic_id)?
        };

        if visible {
            Ok(appt)
        } else {
            Err(BookingError::NotFound(format!("Appointment {}", appointment_id)))
        }
    }
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN))
}
