//! Inputs to the booking workflow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::MemberRole;

/// A vet booking directly into their own schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DirectBooking {
    /// Target clinic; the vet's personal clinic when omitted
    #[serde(default)]
    pub clinic_id: Option<String>,
    pub pet_id: String,
    #[serde(rename = "startDateTime")]
    pub start: DateTime<Utc>,
    #[serde(rename = "endDateTime")]
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// An owner asking for an appointment. At least one of `clinic_id` and
/// `vet_id` must be given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    #[serde(default)]
    pub clinic_id: Option<String>,
    #[serde(default)]
    pub vet_id: Option<String>,
    pub pet_id: String,
    #[serde(rename = "startDateTime")]
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Clinic-side handling of a pending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManageAction {
    /// Confirm, assigning the acting vet if nobody is assigned yet
    Approve,
    /// Cancel a pending request
    Reject,
    /// Hand the appointment to another active member
    Assign { vet_id: String },
}

/// Calendar query. Missing bounds default to a week starting today.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleQuery {
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub clinic_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewClinic {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Partial clinic update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClinicUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub vet_id: String,
    #[serde(default = "default_invite_role")]
    pub role: MemberRole,
}

fn default_invite_role() -> MemberRole {
    MemberRole::Vet
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPet {
    pub name: String,
    pub species: String,
    #[serde(default)]
    pub breed: Option<String>,
}

/// Reject blank required text.
pub(crate) fn required(field: &str, value: &str) -> Result<String, super::BookingError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(super::BookingError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}
