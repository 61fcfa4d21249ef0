//! Clinic and membership database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{classify_write_error, Database, DbError, DbResult};
use crate::models::{Clinic, ClinicMember, MemberRole, MemberStatus};

const CLINIC_COLUMNS: &str = "c.id, c.name, c.address, c.phone, c.personal, c.created_at, c.updated_at";

impl Database {
    /// Insert a new clinic.
    pub fn insert_clinic(&self, clinic: &Clinic) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO clinics (id, name, address, phone, personal, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                clinic.id,
                clinic.name,
                clinic.address,
                clinic.phone,
                clinic.personal,
                clinic.created_at,
                clinic.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update clinic profile fields.
    pub fn update_clinic(&self, clinic: &Clinic) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE clinics SET
                name = ?2,
                address = ?3,
                phone = ?4,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![clinic.id, clinic.name, clinic.address, clinic.phone],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a clinic by ID.
    pub fn get_clinic(&self, id: &str) -> DbResult<Option<Clinic>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM clinics c WHERE c.id = ?", CLINIC_COLUMNS),
                [id],
                clinic_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Clinics where the vet holds an ACTIVE membership, personal clinics first.
    pub fn list_clinics_for_vet(&self, vet_id: &str) -> DbResult<Vec<Clinic>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {}
            FROM clinics c
            JOIN clinic_members m ON m.clinic_id = c.id
            WHERE m.vet_id = ? AND m.status = 'ACTIVE'
            ORDER BY c.personal DESC, m.created_at ASC
            "#,
            CLINIC_COLUMNS
        ))?;

        let rows = stmt.query_map([vet_id], clinic_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Insert a membership. Fails with `Constraint` if the pair already exists.
    pub fn insert_member(&self, member: &ClinicMember) -> DbResult<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO clinic_members (id, clinic_id, vet_id, role, status, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    member.id,
                    member.clinic_id,
                    member.vet_id,
                    member.role.as_str(),
                    member.status.as_str(),
                    member.created_at,
                ],
            )
            .map_err(|e| classify_write_error(e, None))?;
        Ok(())
    }

    /// Look up a membership by its unique (clinic, vet) key.
    pub fn get_member(&self, clinic_id: &str, vet_id: &str) -> DbResult<Option<ClinicMember>> {
        self.conn
            .query_row(
                r#"
                SELECT id, clinic_id, vet_id, role, status, created_at
                FROM clinic_members
                WHERE clinic_id = ?1 AND vet_id = ?2
                "#,
                params![clinic_id, vet_id],
                member_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Change a membership's status.
    pub fn set_member_status(
        &self,
        clinic_id: &str,
        vet_id: &str,
        status: MemberStatus,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE clinic_members SET status = ?3 WHERE clinic_id = ?1 AND vet_id = ?2",
            params![clinic_id, vet_id, status.as_str()],
        )?;
        Ok(rows_affected > 0)
    }

    /// List the members of a clinic.
    pub fn list_members(&self, clinic_id: &str) -> DbResult<Vec<ClinicMember>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, clinic_id, vet_id, role, status, created_at
            FROM clinic_members
            WHERE clinic_id = ?
            ORDER BY created_at
            "#,
        )?;

        let rows = stmt.query_map([clinic_id], member_row)?;

        let mut members = Vec::new();
        for row in rows {
            members.push(row?.try_into()?);
        }
        Ok(members)
    }
}

fn clinic_from_row(row: &Row<'_>) -> rusqlite::Result<Clinic> {
    Ok(Clinic {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        phone: row.get(3)?,
        personal: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Intermediate row struct for database mapping.
struct MemberRow {
    id: String,
    clinic_id: String,
    vet_id: String,
    role: String,
    status: String,
    created_at: String,
}

fn member_row(row: &Row<'_>) -> rusqlite::Result<MemberRow> {
    Ok(MemberRow {
        id: row.get(0)?,
        clinic_id: row.get(1)?,
        vet_id: row.get(2)?,
        role: row.get(3)?,
        status: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl TryFrom<MemberRow> for ClinicMember {
    type Error = DbError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        let role = MemberRole::parse(&row.role)
            .ok_or_else(|| DbError::Constraint(format!("Unknown member role: {}", row.role)))?;
        let status = MemberStatus::parse(&row.status)
            .ok_or_else(|| DbError::Constraint(format!("Unknown member status: {}", row.status)))?;

        Ok(ClinicMember {
            id: row.id,
            clinic_id: row.clinic_id,
            vet_id: row.vet_id,
            role,
            status,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountKind};

    fn setup_db() -> (Database, Account) {
        let db = Database::open_in_memory().unwrap();
        let vet = Account::new("Dr. Rivera".into(), "rivera@example.com".into(), AccountKind::Vet);
        db.insert_account(&vet).unwrap();
        (db, vet)
    }

    #[test]
    fn test_insert_and_update_clinic() {
        let (db, _) = setup_db();
        let mut clinic = Clinic::new("Northside Animal Hospital".into());
        db.insert_clinic(&clinic).unwrap();

        clinic.phone = Some("555-0100".into());
        assert!(db.update_clinic(&clinic).unwrap());

        let retrieved = db.get_clinic(&clinic.id).unwrap().unwrap();
        assert_eq!(retrieved.phone, Some("555-0100".into()));
        assert!(!retrieved.personal);
    }

    #[test]
    fn test_member_lookup_by_pair() {
        let (db, vet) = setup_db();
        let clinic = Clinic::new("Northside".into());
        db.insert_clinic(&clinic).unwrap();

        let member = ClinicMember::new(
            clinic.id.clone(),
            vet.id.clone(),
            MemberRole::Admin,
            MemberStatus::Invited,
        );
        db.insert_member(&member).unwrap();

        let found = db.get_member(&clinic.id, &vet.id).unwrap().unwrap();
        assert_eq!(found.role, MemberRole::Admin);
        assert_eq!(found.status, MemberStatus::Invited);

        assert!(db
            .set_member_status(&clinic.id, &vet.id, MemberStatus::Active)
            .unwrap());
        let found = db.get_member(&clinic.id, &vet.id).unwrap().unwrap();
        assert!(found.is_active());
    }

    #[test]
    fn test_duplicate_membership_rejected() {
        let (db, vet) = setup_db();
        let clinic = Clinic::new("Northside".into());
        db.insert_clinic(&clinic).unwrap();

        let first = ClinicMember::new(clinic.id.clone(), vet.id.clone(), MemberRole::Owner, MemberStatus::Active);
        let second = ClinicMember::new(clinic.id.clone(), vet.id.clone(), MemberRole::Vet, MemberStatus::Active);
        db.insert_member(&first).unwrap();
        assert!(matches!(db.insert_member(&second), Err(DbError::Constraint(_))));
    }

    #[test]
    fn test_list_clinics_only_active_personal_first() {
        let (db, vet) = setup_db();
        let shared = Clinic::new("Shared".into());
        let invited = Clinic::new("Invited".into());
        let personal = Clinic::personal_for(&vet.name);
        for clinic in [&shared, &invited, &personal] {
            db.insert_clinic(clinic).unwrap();
        }
        db.insert_member(&ClinicMember::new(shared.id.clone(), vet.id.clone(), MemberRole::Vet, MemberStatus::Active))
            .unwrap();
        db.insert_member(&ClinicMember::new(invited.id.clone(), vet.id.clone(), MemberRole::Vet, MemberStatus::Invited))
            .unwrap();
        db.insert_member(&ClinicMember::new(personal.id.clone(), vet.id.clone(), MemberRole::Owner, MemberStatus::Active))
            .unwrap();

        let clinics = db.list_clinics_for_vet(&vet.id).unwrap();
        assert_eq!(clinics.len(), 2);
        assert_eq!(clinics[0].id, personal.id);
        assert_eq!(clinics[1].id, shared.id);
    }
}
