//! Pet endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use petcare_core::booking::NewPet;
use petcare_core::Pet;
use serde::Serialize;

use crate::error::ApiError;
use crate::types::{ApiContext, AuthContext};

#[derive(Serialize)]
pub struct PetsResponse {
    pub pets: Vec<Pet>,
}

/// `POST /pets`
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<NewPet>, JsonRejection>,
) -> Result<(StatusCode, Json<Pet>), ApiError> {
    let Json(input) = payload?;
    let pet = ctx.with_scheduler(|s| s.register_pet(&auth.account, input))?;
    Ok((StatusCode::CREATED, Json(pet)))
}

/// `GET /pets`
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<PetsResponse>, ApiError> {
    let pets = ctx.with_scheduler(|s| s.pets_for(&auth.account))?;
    Ok(Json(PetsResponse { pets }))
}
