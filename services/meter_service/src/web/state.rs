//! services/meter_service/src/web/state.rs
//!
//! Defines the application's shared state.

use meter_capture_core::{
    controller::AppController,
    coordinator::SubmissionCoordinator,
    persistence::SessionPersistence,
    ports::{
        FormattingService, KeyValueStore, NotificationService, PortResult, SpreadsheetExporter,
    },
};
use std::sync::Arc;
use tokio::sync::Mutex;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// There is one operator and one session per running service. The controller
/// sits behind a mutex held for the whole of each command, so commands (including
/// a submission waiting on the network) never interleave.
pub struct AppState {
    pub controller: Mutex<AppController>,
}

impl AppState {
    /// Wires the core around the given adapters and restores any stored user
    /// and offline session.
    pub async fn new(
        store: Arc<dyn KeyValueStore>,
        formatter: Arc<dyn FormattingService>,
        exporter: Arc<dyn SpreadsheetExporter>,
        notifier: Arc<dyn NotificationService>,
    ) -> PortResult<Self> {
        let persistence = SessionPersistence::new(store);
        let coordinator =
            SubmissionCoordinator::new(formatter, exporter, notifier, persistence.clone());

        let mut controller = AppController::new(persistence, coordinator);
        controller.restore().await?;

        Ok(Self {
            controller: Mutex::new(controller),
        })
    }
}
