//! Registration, login, logout and the current-caller endpoint.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, Caller};
use crate::auth::{generate_token, hash_password, hash_token, verify_password};
use crate::db::repository::{session, user};
use crate::models::{Identity, NewIdentity, User};

#[derive(Serialize)]
pub struct IdentityResponse {
    pub user: User,
    pub identity: Identity,
}

/// `POST /api/auth/register` — create an account and its profile in one
/// step. The role tag in the payload decides which profile fields are
/// required; see `NewIdentity`.
pub async fn register(
    State(ctx): State<ApiContext>,
    Json(reg): Json<NewIdentity>,
) -> Result<Json<IdentityResponse>, ApiError> {
    reg.validate()?;
    let password_hash = hash_password(&reg.user().password)?;

    let mut conn = ctx.open_db()?;
    let (created, identity) = user::create_identity(&mut conn, &reg, &password_hash)?;

    tracing::info!(username = %created.username, role = %created.role.as_str(), "registered");
    Ok(Json(IdentityResponse {
        user: created,
        identity,
    }))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// `POST /api/auth/login` — verify credentials and issue a bearer token.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let (found, stored_hash) = user::credentials_by_username(&conn, &req.username)?
        .ok_or(ApiError::InvalidCredentials)?;
    verify_password(&req.password, &stored_hash)?;
    if !found.is_active {
        return Err(ApiError::InvalidCredentials);
    }

    let token = generate_token();
    session::insert_session(&conn, &hash_token(&token), &found.id)?;

    tracing::debug!(username = %found.username, "login");
    Ok(Json(LoginResponse { token, user: found }))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub status: &'static str,
}

/// `POST /api/auth/logout` — revoke the presented session.
pub async fn logout(
    State(ctx): State<ApiContext>,
    Extension(_caller): Extension<Caller>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, ApiError> {
    let token = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    let conn = ctx.open_db()?;
    session::delete_session(&conn, &hash_token(token))?;
    Ok(Json(LogoutResponse { status: "ok" }))
}

/// `GET /api/me` — the authenticated user and identity.
pub async fn me(Extension(caller): Extension<Caller>) -> Json<IdentityResponse> {
    Json(IdentityResponse {
        user: caller.user,
        identity: caller.identity,
    })
}
