//! services/meter_service/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.
//!
//! Operator-facing warnings are in German, matching the client's language.

use crate::web::{
    protocol::{
        CodeCaptureRequest, CompleteRequest, FieldUpdate, FinalizeResponse,
        LocationCaptureRequest, PhotoCaptureRequest, RegisterRequest, SearchParams,
        SearchResponse, SessionView, SignatureRequest, SubmitResponse, SubmitStatus,
        UserResponse,
    },
    state::AppState,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use meter_capture_core::{
    controller::CaptureError,
    coordinator::SubmitError,
    domain::{CompanyUpdate, ContactUpdate, DraftUpdate, User},
};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::OpenApi;

pub const CAMERA_DENIED: &str =
    "Keine Kameraberechtigung. Bitte erteilen Sie die Kameraberechtigung in den Einstellungen.";
pub const LOCATION_DENIED: &str =
    "Keine Standortberechtigung. Bitte erteilen Sie die Standortberechtigung in den Einstellungen.";
pub const SIGNATURE_DENIED: &str = "Die Unterschrift konnte nicht erfasst werden.";
pub const INCOMPLETE_WARNING: &str =
    "Bitte bestätigen Sie, dass alle Zähler vollständig erfasst wurden.";
pub const SIGNATURE_WARNING: &str = "Bitte unterschreiben Sie die Datenschutzerklärung.";
pub const SUBMITTED_MESSAGE: &str = "Daten wurden erfolgreich exportiert. Eine Benachrichtigung wurde an Ihre E-Mail-Adresse gesendet.";
pub const SAVED_OFFLINE_MESSAGE: &str = "Es gab ein Problem beim Exportieren der Daten. Die Daten werden lokal gespeichert und später synchronisiert.";
pub const NOT_SAVED_MESSAGE: &str =
    "Die Daten konnten weder exportiert noch lokal gespeichert werden.";

type HandlerError = (StatusCode, String);

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        register_handler,
        logout_handler,
        me_handler,
        get_session_handler,
        update_company_handler,
        update_contact_handler,
        set_complete_handler,
        update_draft_handler,
        capture_photo_handler,
        capture_location_handler,
        scan_code_handler,
        finalize_meter_handler,
        search_meters_handler,
        capture_signature_handler,
        clear_signature_handler,
        submit_handler,
    ),
    components(
        schemas(
            RegisterRequest, UserResponse, SessionView, FieldUpdate, CompleteRequest,
            PhotoCaptureRequest, LocationCaptureRequest, CodeCaptureRequest, SignatureRequest,
            FinalizeResponse, SearchResponse, SubmitStatus, SubmitResponse
        )
    ),
    tags(
        (name = "Meter Capture API", description = "Commands for capturing and submitting meter readings.")
    )
)]
pub struct ApiDoc;

fn internal_error(context: &str, e: impl std::fmt::Debug) -> HandlerError {
    error!("{}: {:?}", context, e);
    (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
}

fn capture_failure(e: CaptureError, denied_warning: &str) -> HandlerError {
    match e {
        CaptureError::PermissionDenied(_) => (StatusCode::FORBIDDEN, denied_warning.to_string()),
        CaptureError::Device(e) => internal_error("Capture failed", e),
    }
}

//=========================================================================================
// User Handlers
//=========================================================================================

/// Register a new local user. Replaces any user already registered.
#[utoipa::path(
    post,
    path = "/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 500, description = "Could not store the user")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), HandlerError> {
    let user = state
        .controller
        .lock()
        .await
        .register(req.into())
        .await
        .map_err(|e| internal_error("Failed to register user", e))?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Log out, deleting the stored user.
#[utoipa::path(
    post,
    path = "/users/logout",
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "No registered user")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, HandlerError> {
    state
        .controller
        .lock()
        .await
        .logout()
        .await
        .map_err(|e| internal_error("Failed to log out", e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// The registered user and their code.
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "The registered user", body = UserResponse),
        (status = 401, description = "No registered user")
    )
)]
pub async fn me_handler(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(user.into())
}

//=========================================================================================
// Session Editing Handlers
//=========================================================================================

#[utoipa::path(
    get,
    path = "/session",
    responses((status = 200, description = "The current session", body = SessionView))
)]
pub async fn get_session_handler(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    let controller = state.controller.lock().await;
    Json(SessionView::from(controller.session()))
}

/// Set one company field, e.g. `{"field": "zipCode", "value": "10115"}`.
#[utoipa::path(
    put,
    path = "/session/company",
    request_body = FieldUpdate,
    responses((status = 200, description = "Updated session", body = SessionView))
)]
pub async fn update_company_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<CompanyUpdate>,
) -> Json<SessionView> {
    let mut controller = state.controller.lock().await;
    controller.update_company(update);
    Json(SessionView::from(controller.session()))
}

/// Set one contact field, e.g. `{"field": "email", "value": "a@b.de"}`.
#[utoipa::path(
    put,
    path = "/session/contact",
    request_body = FieldUpdate,
    responses((status = 200, description = "Updated session", body = SessionView))
)]
pub async fn update_contact_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ContactUpdate>,
) -> Json<SessionView> {
    let mut controller = state.controller.lock().await;
    controller.update_contact(update);
    Json(SessionView::from(controller.session()))
}

/// Confirm (or withdraw) that all meters have been captured.
#[utoipa::path(
    put,
    path = "/session/complete",
    request_body = CompleteRequest,
    responses((status = 200, description = "Updated session", body = SessionView))
)]
pub async fn set_complete_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CompleteRequest>,
) -> Json<SessionView> {
    let mut controller = state.controller.lock().await;
    controller.set_complete(req.is_complete);
    Json(SessionView::from(controller.session()))
}

//=========================================================================================
// Meter Handlers
//=========================================================================================

/// Set one draft field, e.g. `{"field": "energyType", "value": "Strom"}`.
#[utoipa::path(
    put,
    path = "/session/draft",
    request_body = FieldUpdate,
    responses((status = 200, description = "Updated session", body = SessionView))
)]
pub async fn update_draft_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<DraftUpdate>,
) -> Json<SessionView> {
    let mut controller = state.controller.lock().await;
    controller.update_draft(update);
    Json(SessionView::from(controller.session()))
}

#[utoipa::path(
    post,
    path = "/session/draft/photo",
    request_body = PhotoCaptureRequest,
    responses(
        (status = 200, description = "Photo attached to the draft", body = SessionView),
        (status = 403, description = "Camera permission refused")
    )
)]
pub async fn capture_photo_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PhotoCaptureRequest>,
) -> Result<Json<SessionView>, HandlerError> {
    let mut controller = state.controller.lock().await;
    controller
        .capture_photo(&req.report, req.kind)
        .await
        .map_err(|e| capture_failure(e, CAMERA_DENIED))?;
    Ok(Json(SessionView::from(controller.session())))
}

/// Record the position fix and the current time on the draft.
#[utoipa::path(
    post,
    path = "/session/draft/location",
    request_body = LocationCaptureRequest,
    responses(
        (status = 200, description = "Location attached to the draft", body = SessionView),
        (status = 403, description = "Location permission refused")
    )
)]
pub async fn capture_location_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LocationCaptureRequest>,
) -> Result<Json<SessionView>, HandlerError> {
    let mut controller = state.controller.lock().await;
    controller
        .capture_location(&req.report)
        .await
        .map_err(|e| capture_failure(e, LOCATION_DENIED))?;
    Ok(Json(SessionView::from(controller.session())))
}

#[utoipa::path(
    post,
    path = "/session/draft/code",
    request_body = CodeCaptureRequest,
    responses(
        (status = 200, description = "Code attached to the draft", body = SessionView),
        (status = 403, description = "Camera permission refused")
    )
)]
pub async fn scan_code_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CodeCaptureRequest>,
) -> Result<Json<SessionView>, HandlerError> {
    let mut controller = state.controller.lock().await;
    controller
        .scan_code(&req.report)
        .await
        .map_err(|e| capture_failure(e, CAMERA_DENIED))?;
    Ok(Json(SessionView::from(controller.session())))
}

/// Add the draft to the session's meters and start a new draft.
#[utoipa::path(
    post,
    path = "/session/meters",
    responses((status = 201, description = "Meter added", body = FinalizeResponse))
)]
pub async fn finalize_meter_handler(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<FinalizeResponse>) {
    let mut controller = state.controller.lock().await;
    let index = controller.finalize_meter();
    let meter_count = controller.session().meters.len();
    (
        StatusCode::CREATED,
        Json(FinalizeResponse { index, meter_count }),
    )
}

#[utoipa::path(
    get,
    path = "/session/meters/search",
    params(SearchParams),
    responses((status = 200, description = "Matching meters", body = SearchResponse))
)]
pub async fn search_meters_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let meters = state.controller.lock().await.search(&params.q);
    Json(SearchResponse { meters })
}

//=========================================================================================
// Signature and Submission Handlers
//=========================================================================================

#[utoipa::path(
    post,
    path = "/session/signature",
    request_body = SignatureRequest,
    responses(
        (status = 200, description = "Signature stored", body = SessionView),
        (status = 403, description = "Signature refused")
    )
)]
pub async fn capture_signature_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignatureRequest>,
) -> Result<Json<SessionView>, HandlerError> {
    let mut controller = state.controller.lock().await;
    controller
        .capture_signature(&req.report)
        .await
        .map_err(|e| capture_failure(e, SIGNATURE_DENIED))?;
    Ok(Json(SessionView::from(controller.session())))
}

#[utoipa::path(
    delete,
    path = "/session/signature",
    responses((status = 200, description = "Signature cleared", body = SessionView))
)]
pub async fn clear_signature_handler(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    let mut controller = state.controller.lock().await;
    controller.set_signature(None);
    Json(SessionView::from(controller.session()))
}

/// Submit the session for formatting and export.
///
/// A delivery failure is not an error for the client: the session has been
/// saved locally, so the response is 202 and the session stays as it was.
#[utoipa::path(
    post,
    path = "/session/submit",
    responses(
        (status = 200, description = "Exported; the session has been reset", body = SubmitResponse),
        (status = 202, description = "Export failed; session saved locally", body = SubmitResponse),
        (status = 422, description = "Completeness not confirmed or signature missing"),
        (status = 500, description = "Export and local save both failed")
    )
)]
pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<(StatusCode, Json<SubmitResponse>), HandlerError> {
    let mut controller = state.controller.lock().await;
    match controller.submit().await {
        Ok(receipt) => {
            info!(user_code = %user.code, notified = %receipt.notified, "Session exported");
            Ok((
                StatusCode::OK,
                Json(SubmitResponse {
                    status: SubmitStatus::Submitted,
                    message: SUBMITTED_MESSAGE.to_string(),
                    formatted: Some(receipt.formatted),
                }),
            ))
        }
        Err(SubmitError::IncompleteSession) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            INCOMPLETE_WARNING.to_string(),
        )),
        Err(SubmitError::MissingSignature) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            SIGNATURE_WARNING.to_string(),
        )),
        Err(SubmitError::DeliveryFailed(e)) => {
            warn!(user_code = %user.code, "Export failed, session kept offline: {}", e);
            Ok((
                StatusCode::ACCEPTED,
                Json(SubmitResponse {
                    status: SubmitStatus::SavedOffline,
                    message: SAVED_OFFLINE_MESSAGE.to_string(),
                    formatted: None,
                }),
            ))
        }
        Err(e @ SubmitError::OfflineSaveFailed { .. }) => {
            error!("{}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, NOT_SAVED_MESSAGE.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_doc_lists_every_route() {
        let api = ApiDoc::openapi();
        assert_eq!(api.paths.paths.len(), 15);

        let signature = &api.paths.paths["/session/signature"];
        assert!(signature.post.is_some());
        assert!(signature.delete.is_some());
        assert!(api.paths.paths.contains_key("/session/meters/search"));
    }
}
