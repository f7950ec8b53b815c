//! services/meter_service/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the mobile client and the
//! service. Field edits (`CompanyUpdate`, `ContactUpdate`, `DraftUpdate`) are
//! taken straight from the core crate as `{"field": ..., "value": ...}`.

use crate::adapters::DeviceReport;
use meter_capture_core::{
    domain::{
        CompanyInfo, ContactInfo, GeoPoint, MeterReading, NewUser, PhotoKind, Signature, User,
    },
    session::{Session, SessionState},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

//=========================================================================================
// Requests
//=========================================================================================

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<RegisterRequest> for NewUser {
    fn from(req: RegisterRequest) -> Self {
        NewUser {
            name: req.name,
            email: req.email,
        }
    }
}

/// Documentation shape of the company, contact and draft field edits.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FieldUpdate {
    #[schema(example = "zipCode")]
    pub field: String,
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
}

/// The operator's answer to "are all meters captured?".
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    pub is_complete: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PhotoCaptureRequest {
    #[schema(value_type = String, example = "meterPhoto")]
    pub kind: PhotoKind,
    /// The picture URI, or a refusal.
    #[schema(value_type = Object)]
    pub report: DeviceReport<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LocationCaptureRequest {
    /// `{"latitude": .., "longitude": ..}`, or a refusal.
    #[schema(value_type = Object)]
    pub report: DeviceReport<GeoPoint>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CodeCaptureRequest {
    /// The decoded barcode contents, or a refusal.
    #[schema(value_type = Object)]
    pub report: DeviceReport<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignatureRequest {
    /// The signature blob, or a refusal.
    #[schema(value_type = Object)]
    pub report: DeviceReport<Signature>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Matched against scanned codes and energy types.
    #[serde(default)]
    pub q: String,
}

//=========================================================================================
// Responses
//=========================================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub code: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            code: user.code,
        }
    }
}

/// Everything the client needs to render the form.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    #[schema(value_type = String, example = "collecting")]
    pub state: SessionState,
    #[schema(value_type = Object)]
    pub company_info: CompanyInfo,
    #[schema(value_type = Object)]
    pub contact_info: ContactInfo,
    #[schema(value_type = Object)]
    pub draft: MeterReading,
    #[schema(value_type = Vec<Object>)]
    pub meters: Vec<MeterReading>,
    pub is_complete: bool,
    pub has_signature: bool,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            state: session.state(),
            company_info: session.company_info.clone(),
            contact_info: session.contact_info.clone(),
            draft: session.meters.draft().clone(),
            meters: session.meters.meters().to_vec(),
            is_complete: session.is_complete,
            has_signature: session.signature.is_some(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeResponse {
    pub index: usize,
    pub meter_count: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    #[schema(value_type = Vec<Object>)]
    pub meters: Vec<MeterReading>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubmitStatus {
    Submitted,
    SavedOffline,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitResponse {
    pub status: SubmitStatus,
    pub message: String,
    pub formatted: Option<String>,
}
