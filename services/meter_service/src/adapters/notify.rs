//! services/meter_service/src/adapters/notify.rs
//!
//! Export notifications. Mail delivery is not wired up; the adapter records
//! the notification in the log.

use async_trait::async_trait;
use meter_capture_core::ports::{NotificationService, PortResult};
use tracing::info;

#[derive(Clone, Default)]
pub struct LogNotificationAdapter;

#[async_trait]
impl NotificationService for LogNotificationAdapter {
    async fn notify_export(&self, email: &str) -> PortResult<()> {
        info!("Export notification sent to: {}", email);
        Ok(())
    }
}
