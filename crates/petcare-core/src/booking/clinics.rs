//! Clinic, membership and pet management.

use tracing::info;

use crate::models::{Account, Clinic, ClinicMember, MemberRole, MemberStatus, Pet};

use super::requests::required;
use super::{BookingError, BookingResult, ClinicUpdate, Invitation, NewClinic, NewPet, Scheduler};

impl<'a> Scheduler<'a> {
    /// The clinic a vet books into by default.
    ///
    /// Returns the vet's first ACTIVE clinic, preferring a personal one.
    /// When the vet has none, creates a personal clinic with the vet as its
    /// ACTIVE OWNER. Idempotent.
    pub fn ensure_personal_clinic(&self, vet_id: &str) -> BookingResult<Clinic> {
        self.db.immediate(|_| self.ensure_personal_clinic_locked(vet_id))
    }

    /// Body of [`ensure_personal_clinic`](Self::ensure_personal_clinic) for
    /// callers already inside a transaction.
    pub(super) fn ensure_personal_clinic_locked(&self, vet_id: &str) -> BookingResult<Clinic> {
        let vet = self.load_vet(vet_id)?;

        if let Some(clinic) = self.db.list_clinics_for_vet(&vet.id)?.into_iter().next() {
            return Ok(clinic);
        }

        let clinic = Clinic::personal_for(&vet.name);
        self.db.insert_clinic(&clinic)?;
        self.db.insert_member(&ClinicMember::new(
            clinic.id.clone(),
            vet.id.clone(),
            MemberRole::Owner,
            MemberStatus::Active,
        ))?;

        info!(vet_id = %vet.id, clinic_id = %clinic.id, "Created personal clinic");
        Ok(clinic)
    }

    /// Create a clinic with the acting vet as its ACTIVE OWNER.
    pub fn create_clinic(&self, actor: &Account, input: NewClinic) -> BookingResult<Clinic> {
        self.require_vet(actor)?;
        let mut clinic = Clinic::new(required("name", &input.name)?);
        clinic.address = input.address;
        clinic.phone = input.phone;

        self.db.immediate(|_| {
            self.db.insert_clinic(&clinic)?;
            self.db.insert_member(&ClinicMember::new(
                clinic.id.clone(),
                actor.id.clone(),
                MemberRole::Owner,
                MemberStatus::Active,
            ))?;
            Ok::<_, BookingError>(())
        })?;

        info!(vet_id = %actor.id, clinic_id = %clinic.id, "Created clinic");
        Ok(clinic)
    }

    /// Update clinic details. Requires OWNER or ADMIN.
    pub fn update_clinic(
        &self,
        actor: &Account,
        clinic_id: &str,
        update: ClinicUpdate,
    ) -> BookingResult<Clinic> {
        self.require_vet(actor)?;
        self.db.immediate(|_| {
            let mut clinic = self.load_clinic(clinic_id)?;
            self.require_manager(actor, clinic_id)?;

            if let Some(name) = update.name {
                clinic.name = required("name", &name)?;
            }
            if update.address.is_some() {
                clinic.address = update.address;
            }
            if update.phone.is_some() {
                clinic.phone = update.phone;
            }
            clinic.updated_at = chrono::Utc::now().to_rfc3339();
            self.db.update_clinic(&clinic)?;
            Ok(clinic)
        })
    }

    /// Invite a vet into a clinic. Requires OWNER or ADMIN; the OWNER role
    /// cannot be handed out by invitation.
    pub fn invite_member(
        &self,
        actor: &Account,
        clinic_id: &str,
        invitation: Invitation,
    ) -> BookingResult<ClinicMember> {
        self.require_vet(actor)?;
        if invitation.role == MemberRole::Owner {
            return Err(BookingError::Validation(
                "the OWNER role cannot be granted by invitation".into(),
            ));
        }

        self.db.immediate(|_| {
            self.load_clinic(clinic_id)?;
            self.require_manager(actor, clinic_id)?;
            self.load_vet(&invitation.vet_id)?;

            if self.db.get_member(clinic_id, &invitation.vet_id)?.is_some() {
                return Err(BookingError::Conflict(format!(
                    "vet {} already belongs to this clinic",
                    invitation.vet_id
                )));
            }

            let member = ClinicMember::new(
                clinic_id.to_string(),
                invitation.vet_id.clone(),
                invitation.role,
                MemberStatus::Invited,
            );
            self.db.insert_member(&member)?;
            info!(clinic_id, vet_id = %member.vet_id, role = member.role.as_str(), "Invited vet");
            Ok(member)
        })
    }

    /// Accept a pending invitation, activating the membership.
    pub fn accept_invite(&self, actor: &Account, clinic_id: &str) -> BookingResult<ClinicMember> {
        self.require_vet(actor)?;
        self.db.immediate(|_| {
            let mut member = self
                .db
                .get_member(clinic_id, &actor.id)?
                .filter(|m| m.status == MemberStatus::Invited)
                .ok_or_else(|| BookingError::NotFound("Invitation".into()))?;

            self.db
                .set_member_status(clinic_id, &actor.id, MemberStatus::Active)?;
            member.status = MemberStatus::Active;
            info!(clinic_id, vet_id = %actor.id, "Invitation accepted");
            Ok(member)
        })
    }

    /// Clinics where the vet is an ACTIVE member, personal clinic first.
    pub fn clinics_for(&self, actor: &Account) -> BookingResult<Vec<Clinic>> {
        self.require_vet(actor)?;
        Ok(self.db.list_clinics_for_vet(&actor.id)?)
    }

    /// Members of a clinic, visible to its ACTIVE members.
    pub fn clinic_members(&self, actor: &Account, clinic_id: &str) -> BookingResult<Vec<ClinicMember>> {
        self.require_vet(actor)?;
        self.load_clinic(clinic_id)?;
        self.require_member(actor, clinic_id)?;
        Ok(self.db.list_members(clinic_id)?)
    }

    /// Register a pet for the acting owner.
    pub fn register_pet(&self, actor: &Account, input: NewPet) -> BookingResult<Pet> {
        self.require_owner(actor)?;
        let mut pet = Pet::new(
            actor.id.clone(),
            required("name", &input.name)?,
            required("species", &input.species)?,
        );
        pet.breed = input.breed;
        self.db.insert_pet(&pet)?;
        info!(owner_id = %actor.id, pet_id = %pet.id, "Registered pet");
        Ok(pet)
    }

    pub fn pets_for(&self, actor: &Account) -> BookingResult<Vec<Pet>> {
        self.require_owner(actor)?;
        Ok(self.db.list_pets_for_owner(&actor.id)?)
    }

    pub(super) fn load_clinic(&self, clinic_id: &str) -> BookingResult<Clinic> {
        self.db
            .get_clinic(clinic_id)?
            .ok_or_else(|| BookingError::NotFound(format!("Clinic {}", clinic_id)))
    }
}
