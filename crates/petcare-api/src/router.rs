//! API router.
//!
//! Returns a composable `Router` that can be served directly or mounted on
//! another axum app.
//!
//! Middleware stack (outermost → innermost):
//! 1. Extension(ApiContext) → 2. Auth validator → handler

use axum::routing::{get, post, put};
use axum::Router;
use petcare_core::{BookingPolicy, Database};

use crate::endpoints;
use crate::middleware;
use crate::types::ApiContext;

/// Build the API router over an open database.
pub fn api_router(db: Database, policy: BookingPolicy) -> Router {
    build_router(ApiContext::new(db, policy))
}

/// Build router from a pre-constructed `ApiContext`.
pub fn build_router(ctx: ApiContext) -> Router {
    // Path params use `:param` syntax (axum 0.7).
    let protected = Router::new()
        .route(
            "/appointments",
            post(endpoints::appointments::create).get(endpoints::appointments::list),
        )
        .route("/appointments/request", post(endpoints::appointments::request))
        .route("/appointments/mine", get(endpoints::appointments::mine))
        .route("/appointments/:id", get(endpoints::appointments::detail))
        .route(
            "/appointments/:id/status",
            put(endpoints::appointments::update_status),
        )
        .route(
            "/appointments/:id/manage",
            post(endpoints::appointments::manage),
        )
        .route(
            "/appointments/:id/assign-confirm",
            post(endpoints::appointments::assign_confirm),
        )
        .route("/vets/:id/slots", get(endpoints::slots::list))
        .route(
            "/pets",
            post(endpoints::pets::create).get(endpoints::pets::list),
        )
        .route(
            "/clinics",
            post(endpoints::clinics::create).get(endpoints::clinics::list),
        )
        .route("/clinics/:id", put(endpoints::clinics::update))
        .route("/clinics/:id/members", get(endpoints::clinics::members))
        .route("/clinics/:id/invites", post(endpoints::clinics::invite))
        .route("/clinics/:id/accept", post(endpoints::clinics::accept))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        // Extension must be outermost so middleware can extract ApiContext
        .layer(axum::Extension(ctx));

    let unprotected = Router::new().route("/health", get(endpoints::health::check));

    Router::new().merge(protected).merge(unprotected)
}
