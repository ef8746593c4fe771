//! Bearer token authentication middleware.
//!
//! Extracts `Authorization: Bearer <token>`, resolves the session in the
//! store, and injects `Caller` (user + identity) into request extensions
//! for downstream handlers.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, Caller};
use crate::auth::hash_token;
use crate::db::repository::{session, user};

pub async fn require_auth(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_auth_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_auth_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    let conn = ctx.open_db()?;
    let found = session::user_for_token(&conn, &hash_token(&token))?;
    let caller_user = found.ok_or(ApiError::Unauthorized)?;
    let identity = user::load_identity(&conn, &caller_user)?;

    req.extensions_mut().insert(Caller {
        user: caller_user,
        identity,
    });

    Ok(next.run(req).await)
}
