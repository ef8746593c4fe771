//! Avatar upload for the caller's own profile.

use axum::extract::{Multipart, State};
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, Caller};
use crate::db::repository::{doctor, patient};
use crate::media;
use crate::models::Identity;

#[derive(Serialize)]
pub struct AvatarResponse {
    pub avatar: String,
}

/// `POST /api/profile/avatar` — multipart upload; replaces the caller's
/// avatar reference. Managers carry no profile, so there is nothing to
/// attach an avatar to.
pub async fn upload(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<Caller>,
    mut multipart: Multipart,
) -> Result<Json<AvatarResponse>, ApiError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
        .ok_or_else(|| ApiError::BadRequest("no file in upload".into()))?;
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid upload: {e}")))?;

    let reference = media::store_avatar(&ctx.media_dir, &bytes)?;

    let conn = ctx.open_db()?;
    match &caller.identity {
        Identity::Doctor(own) => doctor::update_doctor_avatar(&conn, &own.id, &reference)?,
        Identity::Patient(own) => patient::update_patient_avatar(&conn, &own.id, &reference)?,
        Identity::Manager => {
            return Err(ApiError::Forbidden("managers have no profile".into()))
        }
    }

    tracing::debug!(avatar = %reference, "avatar updated");
    Ok(Json(AvatarResponse { avatar: reference }))
}
