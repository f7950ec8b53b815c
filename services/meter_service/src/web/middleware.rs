//! services/meter_service/src/web/middleware.rs
//!
//! Registration gate for the session routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::web::state::AppState;

/// Middleware that lets a request through only once a user is registered.
///
/// If one is, the `User` is inserted into request extensions for handlers to use.
/// Otherwise returns 401 Unauthorized.
pub async fn require_user(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let user = state.controller.lock().await.user().cloned();

    let Some(user) = user else {
        warn!("Rejected {} {}: no registered user", req.method(), req.uri().path());
        return Err(StatusCode::UNAUTHORIZED);
    };

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
