//! Free-slot endpoint.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::types::{ApiContext, AuthContext};

#[derive(Deserialize)]
pub struct SlotsQuery {
    /// `YYYY-MM-DD`
    pub date: NaiveDate,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub slots: Vec<String>,
}

/// `GET /vets/:id/slots?date=YYYY-MM-DD`: open to any authenticated account.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(_auth): Extension<AuthContext>,
    Path(vet_id): Path<String>,
    query: Result<Query<SlotsQuery>, QueryRejection>,
) -> Result<Json<SlotsResponse>, ApiError> {
    let Query(query) = query?;
    let slots = ctx.with_scheduler(|s| s.available_slots(&vet_id, query.date, Utc::now()))?;
    Ok(Json(SlotsResponse { slots }))
}
