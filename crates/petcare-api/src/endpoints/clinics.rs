//! Clinic and staff endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use petcare_core::booking::{ClinicUpdate, Invitation, NewClinic};
use petcare_core::{Clinic, ClinicMember};
use serde::Serialize;

use crate::error::ApiError;
use crate::types::{ApiContext, AuthContext};

#[derive(Serialize)]
pub struct ClinicsResponse {
    pub clinics: Vec<Clinic>,
}

#[derive(Serialize)]
pub struct MembersResponse {
    pub members: Vec<ClinicMember>,
}

/// `POST /clinics`
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<NewClinic>, JsonRejection>,
) -> Result<(StatusCode, Json<Clinic>), ApiError> {
    let Json(input) = payload?;
    let clinic = ctx.with_scheduler(|s| s.create_clinic(&auth.account, input))?;
    Ok((StatusCode::CREATED, Json(clinic)))
}

/// `GET /clinics`: the caller's ACTIVE clinics.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<ClinicsResponse>, ApiError> {
    let clinics = ctx.with_scheduler(|s| s.clinics_for(&auth.account))?;
    Ok(Json(ClinicsResponse { clinics }))
}

/// `PUT /clinics/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(auth): Extension<AuthContext>,
    Path(clinic_id): Path<String>,
    payload: Result<Json<ClinicUpdate>, JsonRejection>,
) -> Result<Json<Clinic>, ApiError> {
    let Json(update) = payload?;
    let clinic = ctx.with_scheduler(|s| s.update_clinic(&auth.account, &clinic_id, update))?;
    Ok(Json(clinic))
}

/// `GET /clinics/:id/members`
pub async fn members(
    State(ctx): State<ApiContext>,
    Extension(auth): Extension<AuthContext>,
    Path(clinic_id): Path<String>,
) -> Result<Json<MembersResponse>, ApiError> {
    let members = ctx.with_scheduler(|s| s.clinic_members(&auth.account, &clinic_id))?;
    Ok(Json(MembersResponse { members }))
}

/// `POST /clinics/:id/invites`
pub async fn invite(
    State(ctx): State<ApiContext>,
    Extension(auth): Extension<AuthContext>,
    Path(clinic_id): Path<String>,
    payload: Result<Json<Invitation>, JsonRejection>,
) -> Result<(StatusCode, Json<ClinicMember>), ApiError> {
    let Json(invitation) = payload?;
    let member = ctx.with_scheduler(|s| s.invite_member(&auth.account, &clinic_id, invitation))?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// `POST /clinics/:id/accept`
pub async fn accept(
    State(ctx): State<ApiContext>,
    Extension(auth): Extension<AuthContext>,
    Path(clinic_id): Path<String>,
) -> Result<Json<ClinicMember>, ApiError> {
    let member = ctx.with_scheduler(|s| s.accept_invite(&auth.account, &clinic_id))?;
    Ok(Json(member))
}
