//! Pet models.

use serde::{Deserialize, Serialize};

/// A pet registered by its owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    /// Unique pet ID
    pub id: String,
    /// Owning account ID
    pub owner_id: String,
    /// Pet name
    pub name: String,
    /// Species (e.g., "canine", "feline")
    pub species: String,
    /// Breed
    pub breed: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl Pet {
    /// Create a new pet with required fields.
    pub fn new(owner_id: String, name: String, species: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            name,
            species: species.to_lowercase(),
            breed: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_owned_by(&self, account_id: &str) -> bool {
        self.owner_id == account_id
    }
}
