//! crates/meter_capture_core/src/session.rs
//!
//! The in-memory submission session: header data, meters, the operator's
//! completeness confirmation and the signature.

use crate::domain::{CompanyInfo, ContactInfo, SessionData, Signature};
use crate::store::MeterRecordStore;
use serde::{Deserialize, Serialize};

/// Where a session stands before submission. Submission outcomes are
/// reported by `SubmissionCoordinator::submit` rather than stored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Empty,
    Collecting,
    ReadyForSubmission,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub company_info: CompanyInfo,
    pub contact_info: ContactInfo,
    pub meters: MeterRecordStore,
    pub is_complete: bool,
    pub signature: Option<Signature>,
}

impl Session {
    /// Rebuilds a session from a saved blob. The completeness flag and the
    /// signature are not part of the blob and start out unset.
    pub fn from_data(data: SessionData) -> Self {
        Self {
            company_info: data.company_info,
            contact_info: data.contact_info,
            meters: MeterRecordStore::from_meters(data.meters),
            is_complete: false,
            signature: None,
        }
    }

    /// The `{companyInfo, contactInfo, meters}` snapshot used for delivery and
    /// offline storage.
    pub fn to_data(&self) -> SessionData {
        SessionData {
            company_info: self.company_info.clone(),
            contact_info: self.contact_info.clone(),
            meters: self.meters.meters().to_vec(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.is_complete && self.signature.is_some()
    }

    pub fn state(&self) -> SessionState {
        if self.is_ready() {
            SessionState::ReadyForSubmission
        } else if self == &Session::default() {
            SessionState::Empty
        } else {
            SessionState::Collecting
        }
    }

    pub fn reset(&mut self) {
        *self = Session::default();
    }
}
