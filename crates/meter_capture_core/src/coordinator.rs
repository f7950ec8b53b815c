//! crates/meter_capture_core/src/coordinator.rs
//!
//! Submission of a finished session: one remote delivery attempt, and the
//! local fallback that keeps the data when that attempt fails.

use crate::domain::SessionData;
use crate::persistence::SessionPersistence;
use crate::ports::{FormattingService, NotificationService, PortError, SpreadsheetExporter};
use crate::session::Session;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("The operator has not confirmed that all meters were captured")]
    IncompleteSession,
    #[error("The privacy statement has not been signed")]
    MissingSignature,
    /// The session is safe in local storage and can be submitted again later.
    #[error("Delivery failed, session saved locally: {0}")]
    DeliveryFailed(#[source] PortError),
    #[error("Delivery failed ({delivery}) and the local save failed too ({storage})")]
    OfflineSaveFailed {
        delivery: PortError,
        storage: PortError,
    },
}

/// What a successful submission hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub formatted: String,
    pub notified: String,
}

#[derive(Clone)]
pub struct SubmissionCoordinator {
    formatter: Arc<dyn FormattingService>,
    exporter: Arc<dyn SpreadsheetExporter>,
    notifier: Arc<dyn NotificationService>,
    persistence: SessionPersistence,
}

impl SubmissionCoordinator {
    pub fn new(
        formatter: Arc<dyn FormattingService>,
        exporter: Arc<dyn SpreadsheetExporter>,
        notifier: Arc<dyn NotificationService>,
        persistence: SessionPersistence,
    ) -> Self {
        Self {
            formatter,
            exporter,
            notifier,
            persistence,
        }
    }

    /// Submits `session`.
    ///
    /// Validation failures touch neither the network nor storage. On success
    /// the session is reset and any saved offline copy is removed. On delivery
    /// failure the session is saved under the offline key and left as it was
    /// in memory so the operator can submit again by hand. There is no
    /// automatic retry.
    pub async fn submit(&self, session: &mut Session) -> Result<SubmitReceipt, SubmitError> {
        if !session.is_complete {
            return Err(SubmitError::IncompleteSession);
        }
        if session.signature.is_none() {
            return Err(SubmitError::MissingSignature);
        }

        let data = session.to_data();
        info!(meters = data.meters.len(), "Submitting session");

        match self.deliver(&data).await {
            Ok(formatted) => {
                if let Err(e) = self.persistence.clear_offline().await {
                    warn!("Delivered, but failed to clear the offline copy: {:?}", e);
                }
                session.reset();
                Ok(SubmitReceipt {
                    formatted,
                    notified: data.contact_info.email,
                })
            }
            Err(delivery) => {
                error!("Failed to deliver session: {:?}", delivery);
                match self.persistence.save_offline(&data).await {
                    Ok(()) => {
                        info!("Session saved locally for a later submission");
                        Err(SubmitError::DeliveryFailed(delivery))
                    }
                    Err(storage) => {
                        error!("Failed to save session locally: {:?}", storage);
                        Err(SubmitError::OfflineSaveFailed { delivery, storage })
                    }
                }
            }
        }
    }

    async fn deliver(&self, data: &SessionData) -> Result<String, PortError> {
        let formatted = self.formatter.format_session(data).await?;
        info!("Formatted data for spreadsheet: {}", formatted);
        self.exporter.export(&formatted).await?;
        self.notifier.notify_export(&data.contact_info.email).await?;
        Ok(formatted)
    }
}
