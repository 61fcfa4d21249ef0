//! Bearer token authentication middleware.
//!
//! Extracts `Authorization: Bearer <token>`, resolves it to an account and
//! injects `AuthContext` into request extensions for downstream handlers.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::error::ApiError;
use crate::types::{ApiContext, AuthContext};

/// Require a valid bearer token.
///
/// Reads `ApiContext` from request extensions (injected by the Extension
/// layer).
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
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    // Mutex guard is released inside authenticate, before any .await
    let account = match ctx.authenticate(&token)? {
        Some(account) => account,
        None => {
            debug!(path = %req.uri().path(), "Rejected unknown token");
            return Err(ApiError::Unauthorized);
        }
    };

    req.extensions_mut().insert(AuthContext { account });

    Ok(next.run(req).await)
}
