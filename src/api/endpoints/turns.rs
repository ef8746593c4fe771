//! Turn queue endpoints: request a turn, accept it, list the queue.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, Caller};
use crate::db::repository::turn;
use crate::models::{Identity, NewTurn, Turn};

/// `POST /api/turns` — a patient requests a turn with a doctor. The patient
/// attribution comes from the session and the state always starts pending;
/// neither is caller input.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<Caller>,
    Json(new): Json<NewTurn>,
) -> Result<Json<Turn>, ApiError> {
    let patient = caller.patient()?;
    let conn = ctx.open_db()?;
    // The doctor must exist; a dangling reference fails here, not at FK time.
    crate::db::repository::doctor::get_doctor(&conn, &new.doctor_id)?;
    let created = turn::create_turn(&conn, &patient.id, &new.doctor_id)?;
    tracing::info!(turn = %created.id, doctor = %new.doctor_id, "turn requested");
    Ok(Json(created))
}

#[derive(Serialize)]
pub struct TurnsResponse {
    pub turns: Vec<Turn>,
}

/// `GET /api/turns` — role-scoped: a patient sees their requests, a doctor
/// sees their queue.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<TurnsResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let turns = match &caller.identity {
        Identity::Doctor(doctor) => turn::list_turns_for_doctor(&conn, &doctor.id)?,
        Identity::Patient(patient) => turn::list_turns_for_patient(&conn, &patient.id)?,
        Identity::Manager => {
            return Err(ApiError::Forbidden("managers have no turn queue".into()))
        }
    };
    Ok(Json(TurnsResponse { turns }))
}

/// `POST /api/turns/:id/accept` — the turn's doctor accepts a pending turn.
pub async fn accept(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Json<Turn>, ApiError> {
    let doctor = caller.doctor()?;
    let mut conn = ctx.open_db()?;

    let existing = turn::get_turn(&conn, &id)?;
    if existing.doctor_id != doctor.id {
        return Err(ApiError::Forbidden("not your turn queue".into()));
    }

    let accepted = turn::accept_turn(&mut conn, &id)?;
    tracing::info!(turn = %accepted.id, "turn accepted");
    Ok(Json(accepted))
}
