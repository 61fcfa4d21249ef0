//! Appointment models and the status lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scheduling::TimeRange;

/// Appointment status.
///
/// ```text
///   PENDING_APPROVAL ──► CONFIRMED ──► COMPLETED
///          │                 │
///          ├──► CANCELLED ◄──┤
///          └──► NO_SHOW  ◄───┘
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    /// Requested by an owner, awaiting clinic approval
    PendingApproval,
    /// Booked on the vet's schedule
    Confirmed,
    /// Visit took place
    Completed,
    /// Cancelled or rejected
    Cancelled,
    /// Pet did not show up
    NoShow,
}

impl AppointmentStatus {
    /// Statuses that no longer occupy the vet's schedule.
    pub const RELEASED: &'static [AppointmentStatus] =
        &[AppointmentStatus::Cancelled, AppointmentStatus::NoShow];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::PendingApproval => "PENDING_APPROVAL",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::NoShow => "NO_SHOW",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING_APPROVAL" => Some(AppointmentStatus::PendingApproval),
            "CONFIRMED" => Some(AppointmentStatus::Confirmed),
            "COMPLETED" => Some(AppointmentStatus::Completed),
            "CANCELLED" => Some(AppointmentStatus::Cancelled),
            "NO_SHOW" => Some(AppointmentStatus::NoShow),
            _ => None,
        }
    }

    /// Allowed next statuses. Every status change goes through this table.
    pub fn valid_transitions(&self) -> &'static [AppointmentStatus] {
        use AppointmentStatus::*;
        match self {
            PendingApproval => &[Confirmed, Cancelled, NoShow],
            Confirmed => &[Completed, Cancelled, NoShow],
            Completed | Cancelled | NoShow => &[],
        }
    }

    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        self.valid_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }

    /// Whether an appointment in this status blocks the vet's time.
    pub fn occupies_schedule(&self) -> bool {
        !Self::RELEASED.contains(self)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled or requested visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Unique appointment ID
    pub id: String,
    /// Owning clinic
    pub clinic_id: String,
    /// Assigned vet (None for unassigned requests)
    pub vet_id: Option<String>,
    /// Pet being seen
    pub pet_id: String,
    /// Start of the visit (inclusive)
    #[serde(rename = "startDateTime")]
    pub starts_at: DateTime<Utc>,
    /// End of the visit (exclusive)
    #[serde(rename = "endDateTime")]
    pub ends_at: DateTime<Utc>,
    /// Reason for visit
    pub reason: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Lifecycle status
    pub status: AppointmentStatus,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Appointment {
    /// Create a new appointment in the given initial status.
    pub fn new(
        clinic_id: String,
        vet_id: Option<String>,
        pet_id: String,
        range: TimeRange,
        status: AppointmentStatus,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            clinic_id,
            vet_id,
            pet_id,
            starts_at: range.start(),
            ends_at: range.end(),
            reason: None,
            notes: None,
            status,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::from_stored(self.starts_at, self.ends_at)
    }

    pub fn is_assigned_to(&self, vet_id: &str) -> bool {
        self.vet_id.as_deref() == Some(vet_id)
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_pending_transitions() {
        let pending = AppointmentStatus::PendingApproval;
        assert!(pending.can_transition_to(AppointmentStatus::Confirmed));
        assert!(pending.can_transition_to(AppointmentStatus::Cancelled));
        assert!(!pending.can_transition_to(AppointmentStatus::Completed));
        assert!(!pending.can_transition_to(AppointmentStatus::PendingApproval));
    }

    #[test]
    fn test_terminal_statuses_are_absorbing() {
        for status in [
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ] {
            assert!(status.is_terminal());
            assert!(!status.can_transition_to(AppointmentStatus::PendingApproval));
            assert!(!status.can_transition_to(AppointmentStatus::Confirmed));
        }
    }

    #[test]
    fn test_released_statuses() {
        assert!(AppointmentStatus::PendingApproval.occupies_schedule());
        assert!(AppointmentStatus::Confirmed.occupies_schedule());
        assert!(AppointmentStatus::Completed.occupies_schedule());
        assert!(!AppointmentStatus::Cancelled.occupies_schedule());
        assert!(!AppointmentStatus::NoShow.occupies_schedule());
    }

    #[test]
    fn test_serializes_with_api_field_names() {
        let start = Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap();
        let range = TimeRange::new(start, start + chrono::Duration::minutes(30)).unwrap();
        let appt = Appointment::new(
            "clinic-1".into(),
            None,
            "pet-1".into(),
            range,
            AppointmentStatus::PendingApproval,
        );

        let json = serde_json::to_value(&appt).unwrap();
        assert_eq!(json["status"], "PENDING_APPROVAL");
        assert_eq!(json["clinicId"], "clinic-1");
        assert!(json["vetId"].is_null());
        assert_eq!(json["startDateTime"], "2024-01-10T10:00:00Z");
    }
}
