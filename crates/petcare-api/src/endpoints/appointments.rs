//! Appointment endpoints.
//!
//! - `POST /appointments`: vet books directly (CONFIRMED)
//! - `POST /appointments/request`: owner requests (PENDING_APPROVAL)
//! - `GET /appointments`: vet calendar
//! - `GET /appointments/mine`: owner history
//! - `GET /appointments/:id`: single appointment
//! - `PUT /appointments/:id/status`: lifecycle transition
//! - `POST /appointments/:id/manage`: APPROVE / REJECT / ASSIGN
//! - `POST /appointments/:id/assign-confirm`: assign, set length, confirm

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use petcare_core::{
    Appointment, AppointmentRequest, AppointmentStatus, DirectBooking, ManageAction, ScheduleQuery,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::types::{ApiContext, AuthContext};

#[derive(Serialize)]
pub struct AppointmentsResponse {
    pub appointments: Vec<Appointment>,
}

/// `POST /appointments`
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<DirectBooking>, JsonRejection>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let Json(booking) = payload?;
    let appt = ctx.with_scheduler(|s| s.book_direct(&auth.account, booking))?;
    Ok((StatusCode::CREATED, Json(appt)))
}

/// `POST /appointments/request`
pub async fn request(
    State(ctx): State<ApiContext>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<AppointmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let Json(request) = payload?;
    let appt = ctx.with_scheduler(|s| s.request_appointment(&auth.account, request))?;
    Ok((StatusCode::CREATED, Json(appt)))
}

/// `GET /appointments?start&end&clinicId`
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(auth): Extension<AuthContext>,
    query: Result<Query<ScheduleQuery>, QueryRejection>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let Query(query) = query?;
    let appointments = ctx.with_scheduler(|s| s.schedule(&auth.account, query, Utc::now()))?;
    Ok(Json(AppointmentsResponse { appointments }))
}

/// `GET /appointments/mine`
pub async fn mine(
    State(ctx): State<ApiContext>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let appointments = ctx.with_scheduler(|s| s.owner_appointments(&auth.account))?;
    Ok(Json(AppointmentsResponse { appointments }))
}

/// `GET /appointments/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(auth): Extension<AuthContext>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    let appt = ctx.with_scheduler(|s| s.appointment(&auth.account, &appointment_id))?;
    Ok(Json(appt))
}

#[derive(Deserialize)]
pub struct StatusBody {
    pub status: AppointmentStatus,
}

/// `PUT /appointments/:id/status`
pub async fn update_status(
    State(ctx): State<ApiContext>,
    Extension(auth): Extension<AuthContext>,
    Path(appointment_id): Path<String>,
    payload: Result<Json<StatusBody>, JsonRejection>,
) -> Result<Json<Appointment>, ApiError> {
    let Json(body) = payload?;
    let appt =
        ctx.with_scheduler(|s| s.update_status(&auth.account, &appointment_id, body.status))?;
    Ok(Json(appt))
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ManageKind {
    Approve,
    Reject,
    Assign,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageBody {
    pub action: ManageKind,
    #[serde(default)]
    pub vet_id: Option<String>,
}

impl TryFrom<ManageBody> for ManageAction {
    type Error = ApiError;

    fn try_from(body: ManageBody) -> Result<Self, Self::Error> {
        match body.action {
            ManageKind::Approve => Ok(ManageAction::Approve),
            ManageKind::Reject => Ok(ManageAction::Reject),
            ManageKind::Assign => body
                .vet_id
                .map(|vet_id| ManageAction::Assign { vet_id })
                .ok_or_else(|| ApiError::BadRequest("vetId is required for ASSIGN".into())),
        }
    }
}

/// `POST /appointments/:id/manage`
pub async fn manage(
    State(ctx): State<ApiContext>,
    Extension(auth): Extension<AuthContext>,
    Path(appointment_id): Path<String>,
    payload: Result<Json<ManageBody>, JsonRejection>,
) -> Result<Json<Appointment>, ApiError> {
    let Json(body) = payload?;
    let action = ManageAction::try_from(body)?;
    let appt = ctx.with_scheduler(|s| s.manage(&auth.account, &appointment_id, action))?;
    Ok(Json(appt))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignConfirmBody {
    pub vet_id: String,
    pub duration_minutes: i64,
}

/// `POST /appointments/:id/assign-confirm`
pub async fn assign_confirm(
    State(ctx): State<ApiContext>,
    Extension(auth): Extension<AuthContext>,
    Path(appointment_id): Path<String>,
    payload: Result<Json<AssignConfirmBody>, JsonRejection>,
) -> Result<Json<Appointment>, ApiError> {
    let Json(body) = payload?;
    let appt = ctx.with_scheduler(|s| {
        s.assign_and_confirm(
            &auth.account,
            &appointment_id,
            &body.vet_id,
            body.duration_minutes,
        )
    })?;
    Ok(Json(appt))
}
