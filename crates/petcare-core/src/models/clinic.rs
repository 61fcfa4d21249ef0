//! Clinic and membership models.

use serde::{Deserialize, Serialize};

/// A practice location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Clinic {
    /// Unique clinic ID
    pub id: String,
    /// Clinic name
    pub name: String,
    /// Street address
    pub address: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Auto-provisioned for a solo vet
    pub personal: bool,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Clinic {
    /// Create a new clinic.
    pub fn new(name: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            address: None,
            phone: None,
            personal: false,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Create the personal clinic for a vet with no practice of their own.
    pub fn personal_for(vet_name: &str) -> Self {
        let mut clinic = Self::new(format!("{} (personal practice)", vet_name));
        clinic.personal = true;
        clinic
    }
}

/// Role of a vet within a clinic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Owner,
    Admin,
    Vet,
}

impl MemberRole {
    /// Roles allowed to manage clinic-wide resources.
    pub const MANAGERS: &'static [MemberRole] = &[MemberRole::Owner, MemberRole::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Owner => "OWNER",
            MemberRole::Admin => "ADMIN",
            MemberRole::Vet => "VET",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OWNER" => Some(MemberRole::Owner),
            "ADMIN" => Some(MemberRole::Admin),
            "VET" => Some(MemberRole::Vet),
            _ => None,
        }
    }
}

/// Membership status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    Active,
    Invited,
    Inactive,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "ACTIVE",
            MemberStatus::Invited => "INVITED",
            MemberStatus::Inactive => "INACTIVE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(MemberStatus::Active),
            "INVITED" => Some(MemberStatus::Invited),
            "INACTIVE" => Some(MemberStatus::Inactive),
            _ => None,
        }
    }
}

/// Join entity granting a vet a role within a clinic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClinicMember {
    pub id: String,
    pub clinic_id: String,
    pub vet_id: String,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub created_at: String,
}

impl ClinicMember {
    /// Create a membership record.
    pub fn new(clinic_id: String, vet_id: String, role: MemberRole, status: MemberStatus) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            clinic_id,
            vet_id,
            role,
            status,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    /// Active membership holding one of `roles`.
    pub fn holds_any(&self, roles: &[MemberRole]) -> bool {
        self.is_active() && roles.contains(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personal_clinic() {
        let clinic = Clinic::personal_for("Dr. Rivera");
        assert!(clinic.personal);
        assert_eq!(clinic.name, "Dr. Rivera (personal practice)");
    }

    #[test]
    fn test_inactive_member_holds_no_role() {
        let mut member = ClinicMember::new(
            "clinic-1".into(),
            "vet-1".into(),
            MemberRole::Owner,
            MemberStatus::Invited,
        );
        assert!(!member.holds_any(MemberRole::MANAGERS));

        member.status = MemberStatus::Active;
        assert!(member.holds_any(MemberRole::MANAGERS));
        assert!(!member.holds_any(&[MemberRole::Vet]));
    }
}
