//! Clinic-scoped authorization checks.
//!
//! Every check is a fresh lookup by the unique (clinic, vet) membership key.
//! Only ACTIVE memberships grant anything.

use crate::db::{Database, DbResult};
use crate::models::MemberRole;

/// Whether the vet holds an ACTIVE membership with one of `allowed_roles`.
pub fn has_clinic_role(
    db: &Database,
    vet_id: &str,
    clinic_id: &str,
    allowed_roles: &[MemberRole],
) -> DbResult<bool> {
    Ok(db
        .get_member(clinic_id, vet_id)?
        .map(|member| member.holds_any(allowed_roles))
        .unwrap_or(false))
}

/// Whether the vet is an ACTIVE member of the clinic, in any role.
pub fn is_active_member(db: &Database, vet_id: &str, clinic_id: &str) -> DbResult<bool> {
    Ok(db
        .get_member(clinic_id, vet_id)?
        .map(|member| member.is_active())
        .unwrap_or(false))
}
