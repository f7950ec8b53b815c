pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;

pub use middleware::require_user;
pub use state::AppState;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use rest::*;
use std::sync::Arc;

/// Builds the API router. Everything except registration requires a user.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    // Public routes (no user required)
    let public_routes = Router::new().route("/users/register", post(register_handler));

    // Protected routes (registered user required)
    let protected_routes = Router::new()
        .route("/users/logout", post(logout_handler))
        .route("/users/me", get(me_handler))
        .route("/session", get(get_session_handler))
        .route("/session/company", put(update_company_handler))
        .route("/session/contact", put(update_contact_handler))
        .route("/session/complete", put(set_complete_handler))
        .route("/session/draft", put(update_draft_handler))
        .route("/session/draft/photo", post(capture_photo_handler))
        .route("/session/draft/location", post(capture_location_handler))
        .route("/session/draft/code", post(scan_code_handler))
        .route("/session/meters", post(finalize_meter_handler))
        .route("/session/meters/search", get(search_meters_handler))
        .route(
            "/session/signature",
            post(capture_signature_handler).delete(clear_signature_handler),
        )
        .route("/session/submit", post(submit_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_user,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}
