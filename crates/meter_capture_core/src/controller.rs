//! crates/meter_capture_core/src/controller.rs
//!
//! The application context: the active user, the current session and the
//! commands that change them. Rendering layers hold one of these and issue
//! commands instead of mutating state from event callbacks.

use crate::coordinator::{SubmissionCoordinator, SubmitError, SubmitReceipt};
use crate::domain::{
    CompanyUpdate, ContactUpdate, DraftUpdate, MeterReading, NewUser, PhotoKind, Signature, User,
};
use crate::persistence::SessionPersistence;
use crate::ports::{
    BarcodeScanner, CameraService, LocationService, PortError, PortResult, SignaturePad,
};
use crate::session::{Session, SessionState};
use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};

/// Failure of a capture command. The session is unchanged in either case.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// Shown to the operator as a warning asking them to grant access.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Capture failed: {0}")]
    Device(PortError),
}

impl From<PortError> for CaptureError {
    fn from(e: PortError) -> Self {
        match e {
            PortError::PermissionDenied(msg) => CaptureError::PermissionDenied(msg),
            other => CaptureError::Device(other),
        }
    }
}

pub struct AppController {
    user: Option<User>,
    session: Session,
    persistence: SessionPersistence,
    coordinator: SubmissionCoordinator,
}

impl AppController {
    pub fn new(persistence: SessionPersistence, coordinator: SubmissionCoordinator) -> Self {
        Self {
            user: None,
            session: Session::default(),
            persistence,
            coordinator,
        }
    }

    /// Startup: loads the stored user and any session left behind by a failed
    /// submission. The offline copy stays in storage until a submit succeeds.
    ///
    /// A blob that no longer parses is skipped with a warning and left in
    /// storage; only a failing store is an error.
    pub async fn restore(&mut self) -> PortResult<()> {
        self.user = readable(self.persistence.load_user().await, "user")?;
        if let Some(data) = readable(self.persistence.load_offline().await, "offline session")? {
            info!(meters = data.meters.len(), "Restored offline session");
            self.session = Session::from_data(data);
        }
        Ok(())
    }

    //=====================================================================================
    // Users
    //=====================================================================================

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub async fn register(&mut self, new_user: NewUser) -> PortResult<User> {
        let user = User::register(new_user);
        self.persistence.save_user(&user).await?;
        info!(user_id = %user.id, "Registered user");
        self.user = Some(user.clone());
        Ok(user)
    }

    pub async fn logout(&mut self) -> PortResult<()> {
        self.persistence.clear_user().await?;
        self.user = None;
        Ok(())
    }

    //=====================================================================================
    // Session Editing
    //=====================================================================================

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn update_company(&mut self, update: CompanyUpdate) {
        self.session.company_info.apply(update);
    }

    pub fn update_contact(&mut self, update: ContactUpdate) {
        self.session.contact_info.apply(update);
    }

    pub fn update_draft(&mut self, update: DraftUpdate) {
        self.session.meters.update_draft(update);
    }

    pub fn finalize_meter(&mut self) -> usize {
        self.session.meters.finalize_draft()
    }

    pub fn search(&self, query: &str) -> Vec<MeterReading> {
        self.session.meters.search(query)
    }

    pub fn set_complete(&mut self, is_complete: bool) {
        self.session.is_complete = is_complete;
    }

    pub fn set_signature(&mut self, signature: Option<Signature>) {
        self.session.signature = signature;
    }

    //=====================================================================================
    // Capture
    //=====================================================================================

    pub async fn capture_photo(
        &mut self,
        camera: &dyn CameraService,
        kind: PhotoKind,
    ) -> Result<(), CaptureError> {
        let uri = camera.take_picture(kind).await.map_err(log_capture_error)?;
        let update = match kind {
            PhotoKind::MeterPhoto => DraftUpdate::MeterPhoto(Some(uri)),
            PhotoKind::DistancePhoto => DraftUpdate::DistancePhoto(Some(uri)),
        };
        self.session.meters.update_draft(update);
        Ok(())
    }

    /// Sets the draft's location and stamps it with the current time.
    pub async fn capture_location(
        &mut self,
        locator: &dyn LocationService,
    ) -> Result<(), CaptureError> {
        let point = locator.current_position().await.map_err(log_capture_error)?;
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.session
            .meters
            .update_draft(DraftUpdate::Location(Some(point.to_location_string())));
        self.session
            .meters
            .update_draft(DraftUpdate::Timestamp(Some(timestamp)));
        Ok(())
    }

    pub async fn scan_code(&mut self, scanner: &dyn BarcodeScanner) -> Result<(), CaptureError> {
        let code = scanner.scan().await.map_err(log_capture_error)?;
        self.session
            .meters
            .update_draft(DraftUpdate::ScannedCode(Some(code)));
        Ok(())
    }

    pub async fn capture_signature(&mut self, pad: &dyn SignaturePad) -> Result<(), CaptureError> {
        let signature = pad.capture().await.map_err(log_capture_error)?;
        self.session.signature = Some(signature);
        Ok(())
    }

    //=====================================================================================
    // Submission
    //=====================================================================================

    pub async fn submit(&mut self) -> Result<SubmitReceipt, SubmitError> {
        self.coordinator.submit(&mut self.session).await
    }
}

fn log_capture_error(e: PortError) -> CaptureError {
    warn!("Capture did not complete: {}", e);
    CaptureError::from(e)
}

/// Treats an unparseable stored blob as absent.
fn readable<T>(loaded: PortResult<Option<T>>, what: &str) -> PortResult<Option<T>> {
    match loaded {
        Err(PortError::Serialization(e)) => {
            warn!("Ignoring stored {} that could not be read: {}", what, e);
            Ok(None)
        }
        other => other,
    }
}
