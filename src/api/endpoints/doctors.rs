//! Doctor directory endpoints.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, Caller};
use crate::db::repository::doctor;
use crate::models::Doctor;

#[derive(Serialize)]
pub struct DoctorsResponse {
    pub doctors: Vec<Doctor>,
}

/// `GET /api/doctors` — the clinic's doctor directory.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(_caller): Extension<Caller>,
) -> Result<Json<DoctorsResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let doctors = doctor::list_doctors(&conn)?;
    Ok(Json(DoctorsResponse { doctors }))
}

/// `GET /api/doctors/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(_caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Json<Doctor>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(doctor::get_doctor(&conn, &id)?))
}
