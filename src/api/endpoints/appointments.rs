//! Appointment endpoints. Creation is the only operation that consumes a
//! turn; the precondition and atomicity rules live in the repository.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, Caller};
use crate::db::repository::{appointment, turn};
use crate::models::{Appointment, AppointmentDetail, Identity, NewAppointment};

/// `POST /api/appointments` — realize an accepted turn into an appointment,
/// attaching the supplied annotation records.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<Caller>,
    Json(new): Json<NewAppointment>,
) -> Result<Json<Appointment>, ApiError> {
    let doctor = caller.doctor()?;
    let mut conn = ctx.open_db()?;

    let existing = turn::get_turn(&conn, &new.turn_id)?;
    if existing.doctor_id != doctor.id {
        return Err(ApiError::Forbidden("not your turn queue".into()));
    }

    let created = appointment::create_appointment(&mut conn, &new)?;
    tracing::info!(appointment = %created.id, turn = %created.turn_id, "appointment created");
    Ok(Json(created))
}

#[derive(Serialize)]
pub struct AppointmentsResponse {
    pub appointments: Vec<Appointment>,
}

/// `GET /api/appointments` — the caller's appointments (doctor view).
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let doctor = caller.doctor()?;
    let conn = ctx.open_db()?;
    Ok(Json(AppointmentsResponse {
        appointments: appointment::list_appointments_for_doctor(&conn, &doctor.id)?,
    }))
}

/// `GET /api/appointments/:id` — recursive detail: the turn plus all
/// attached annotation records. Visible to the visit's doctor and patient,
/// and to managers.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentDetail>, ApiError> {
    let conn = ctx.open_db()?;
    let detail = appointment::get_appointment_detail(&conn, &id)?;

    let allowed = match &caller.identity {
        Identity::Manager => true,
        Identity::Doctor(doctor) => detail.turn.doctor_id == doctor.id,
        Identity::Patient(patient) => detail.turn.patient_id == patient.id,
    };
    if !allowed {
        return Err(ApiError::Forbidden("not your appointment".into()));
    }

    Ok(Json(detail))
}
