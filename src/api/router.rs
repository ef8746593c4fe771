//! API router.
//!
//! Routes are nested under `/api/`; media files are served under `/media/`.
//! Register, login and health are open; everything else requires a bearer
//! token (auth middleware reads `ApiContext` from the Extension layer).

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the API router.
pub fn api_router(ctx: ApiContext) -> Router {
    let protected = Router::new()
        .route("/me", get(endpoints::auth::me))
        .route("/auth/logout", post(endpoints::auth::logout))
        .route("/doctors", get(endpoints::doctors::list))
        .route("/doctors/:id", get(endpoints::doctors::detail))
        .route("/patients/:id", get(endpoints::patients::detail))
        .route(
            "/turns",
            post(endpoints::turns::create).get(endpoints::turns::list),
        )
        .route("/turns/:id/accept", post(endpoints::turns::accept))
        .route(
            "/symptoms",
            post(endpoints::annotations::create_symptom)
                .get(endpoints::annotations::list_symptoms),
        )
        .route(
            "/diseases",
            post(endpoints::annotations::create_disease)
                .get(endpoints::annotations::list_diseases),
        )
        .route(
            "/advices",
            post(endpoints::annotations::create_advice)
                .get(endpoints::annotations::list_advices),
        )
        .route(
            "/medicines",
            post(endpoints::annotations::create_medicine)
                .get(endpoints::annotations::list_medicines),
        )
        .route(
            "/appointments",
            post(endpoints::appointments::create).get(endpoints::appointments::list),
        )
        .route("/appointments/:id", get(endpoints::appointments::detail))
        .route("/profile/avatar", post(endpoints::avatar::upload))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        .layer(axum::Extension(ctx.clone()));

    let unprotected = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/auth/register", post(endpoints::auth::register))
        .route("/auth/login", post(endpoints::auth::login))
        .with_state(ctx.clone());

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any);

    Router::new()
        .nest("/api", protected)
        .nest("/api", unprotected)
        .nest_service("/media", ServeDir::new(ctx.media_dir.as_ref().clone()))
        .layer(cors)
}
