//! Patient record access, restricted to clinic staff.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, Caller};
use crate::db::repository::patient;
use crate::models::{Identity, Patient};

/// `GET /api/patients/:id` — doctors and managers, or the patient
/// themselves.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Json<Patient>, ApiError> {
    let allowed = match &caller.identity {
        Identity::Manager | Identity::Doctor(_) => true,
        Identity::Patient(own) => own.id == id,
    };
    if !allowed {
        return Err(ApiError::Forbidden("not your record".into()));
    }

    let conn = ctx.open_db()?;
    Ok(Json(patient::get_patient(&conn, &id)?))
}
