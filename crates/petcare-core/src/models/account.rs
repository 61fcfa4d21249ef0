//! Account models (vets and pet owners).

use serde::{Deserialize, Serialize};

/// Kind of account. Vets and owners share one identity table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountKind {
    /// Veterinarian; may belong to clinics and manage appointments
    Vet,
    /// Pet owner; may register pets and request appointments
    Owner,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Vet => "VET",
            AccountKind::Owner => "OWNER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "VET" => Some(AccountKind::Vet),
            "OWNER" => Some(AccountKind::Owner),
            _ => None,
        }
    }
}

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique account ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email (unique)
    pub email: String,
    /// Vet or owner
    pub kind: AccountKind,
    /// Creation timestamp
    pub created_at: String,
}

impl Account {
    /// Create a new account with a fresh ID.
    pub fn new(name: String, email: String, kind: AccountKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            kind,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_vet(&self) -> bool {
        self.kind == AccountKind::Vet
    }

    pub fn is_owner(&self) -> bool {
        self.kind == AccountKind::Owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account() {
        let vet = Account::new("Dr. Rivera".into(), "rivera@example.com".into(), AccountKind::Vet);
        assert!(vet.is_vet());
        assert!(!vet.is_owner());
        assert_eq!(vet.id.len(), 36);
    }

    #[test]
    fn test_kind_round_trips_through_str() {
        assert_eq!(AccountKind::parse(AccountKind::Owner.as_str()), Some(AccountKind::Owner));
        assert_eq!(AccountKind::parse("ADMIN"), None);
    }
}
