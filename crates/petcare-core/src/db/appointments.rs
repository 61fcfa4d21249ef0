//! Appointment database operations.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{classify_write_error, Database, DbError, DbResult};
use crate::models::{Appointment, AppointmentStatus};

const APPOINTMENT_COLUMNS: &str = "a.id, a.clinic_id, a.vet_id, a.pet_id, a.starts_at, a.ends_at, \
     a.reason, a.notes, a.status, a.created_at, a.updated_at";

impl Database {
    /// Insert a new appointment.
    ///
    /// Returns `DbError::Overlap` when the storage trigger finds an
    /// overlapping booking for the same vet and clinic.
    pub fn insert_appointment(&self, appt: &Appointment) -> DbResult<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO appointments (
                    id, clinic_id, vet_id, pet_id, starts_at, ends_at,
                    reason, notes, status, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
                params![
                    appt.id,
                    appt.clinic_id,
                    appt.vet_id,
                    appt.pet_id,
                    appt.starts_at,
                    appt.ends_at,
                    appt.reason,
                    appt.notes,
                    appt.status.as_str(),
                    appt.created_at,
                    appt.updated_at,
                ],
            )
            .map_err(|e| classify_write_error(e, appt.vet_id.as_deref()))?;
        Ok(())
    }

    /// Update the mutable fields of an appointment.
    pub fn update_appointment(&self, appt: &Appointment) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                r#"
                UPDATE appointments SET
                    vet_id = ?2,
                    starts_at = ?3,
                    ends_at = ?4,
                    reason = ?5,
                    notes = ?6,
                    status = ?7,
                    updated_at = ?8
                WHERE id = ?1
                "#,
                params![
                    appt.id,
                    appt.vet_id,
                    appt.starts_at,
                    appt.ends_at,
                    appt.reason,
                    appt.notes,
                    appt.status.as_str(),
                    appt.updated_at,
                ],
            )
            .map_err(|e| classify_write_error(e, appt.vet_id.as_deref()))?;
        Ok(rows_affected > 0)
    }

    /// Get an appointment by ID.
    pub fn get_appointment(&self, id: &str) -> DbResult<Option<Appointment>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM appointments a WHERE a.id = ?", APPOINTMENT_COLUMNS),
                [id],
                appointment_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// All appointments of a vet within one clinic, any status.
    pub fn list_vet_clinic_appointments(
        &self,
        vet_id: &str,
        clinic_id: &str,
    ) -> DbResult<Vec<Appointment>> {
        self.collect_appointments(
            &format!(
                r#"
                SELECT {}
                FROM appointments a
                WHERE a.vet_id = ?1 AND a.clinic_id = ?2
                ORDER BY a.starts_at
                "#,
                APPOINTMENT_COLUMNS
            ),
            params![vet_id, clinic_id],
        )
    }

    /// Appointments of a vet (all clinics) intersecting `[from, to)`.
    pub fn list_vet_appointments_between(
        &self,
        vet_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<Vec<Appointment>> {
        self.collect_appointments(
            &format!(
                r#"
                SELECT {}
                FROM appointments a
                WHERE a.vet_id = ?1 AND a.starts_at < ?3 AND a.ends_at > ?2
                ORDER BY a.starts_at
                "#,
                APPOINTMENT_COLUMNS
            ),
            params![vet_id, from, to],
        )
    }

    /// Appointments of one clinic intersecting `[from, to)`.
    pub fn list_clinic_appointments_between(
        &self,
        clinic_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<Vec<Appointment>> {
        self.collect_appointments(
            &format!(
                r#"
                SELECT {}
                FROM appointments a
                WHERE a.clinic_id = ?1 AND a.starts_at < ?3 AND a.ends_at > ?2
                ORDER BY a.starts_at
                "#,
                APPOINTMENT_COLUMNS
            ),
            params![clinic_id, from, to],
        )
    }

    /// Appointments visible to a vet: assigned to them, or in any clinic
    /// where they are an ACTIVE member, intersecting `[from, to)`.
    pub fn list_visible_appointments_between(
        &self,
        vet_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<Vec<Appointment>> {
        self.collect_appointments(
            &format!(
                r#"
                SELECT {}
                FROM appointments a
                WHERE (a.vet_id = ?1 OR a.clinic_id IN (
                        SELECT clinic_id FROM clinic_members
                        WHERE vet_id = ?1 AND status = 'ACTIVE'))
                  AND a.starts_at < ?3 AND a.ends_at > ?2
                ORDER BY a.starts_at
                "#,
                APPOINTMENT_COLUMNS
            ),
            params![vet_id, from, to],
        )
    }

    /// All appointments for pets belonging to an owner, newest first.
    pub fn list_owner_appointments(&self, owner_id: &str) -> DbResult<Vec<Appointment>> {
        self.collect_appointments(
            &format!(
                r#"
                SELECT {}
                FROM appointments a
                JOIN pets p ON p.id = a.pet_id
                WHERE p.owner_id = ?1
                ORDER BY a.starts_at DESC
                "#,
                APPOINTMENT_COLUMNS
            ),
            params![owner_id],
        )
    }

    fn collect_appointments(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, appointment_row)?;

        let mut appointments = Vec::new();
        for row in rows {
            appointments.push(row?.try_into()?);
        }
        Ok(appointments)
    }
}

/// Intermediate row struct for database mapping.
struct AppointmentRow {
    id: String,
    clinic_id: String,
    vet_id: Option<String>,
    pet_id: String,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    reason: Option<String>,
    notes: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

fn appointment_row(row: &Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        clinic_id: row.get(1)?,
        vet_id: row.get(2)?,
        pet_id: row.get(3)?,
        starts_at: row.get(4)?,
        ends_at: row.get(5)?,
        reason: row.get(6)?,
        notes: row.get(7)?,
        status: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DbError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let status = AppointmentStatus::parse(&row.status).ok_or_else(|| {
            DbError::Constraint(format!("Unknown appointment status: {}", row.status))
        })?;

        Ok(Appointment {
            id: row.id,
            clinic_id: row.clinic_id,
            vet_id: row.vet_id,
            pet_id: row.pet_id,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            reason: row.reason,
            notes: row.notes,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
