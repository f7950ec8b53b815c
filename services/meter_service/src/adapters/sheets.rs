//! services/meter_service/src/adapters/sheets.rs
//!
//! The spreadsheet export step. There is no spreadsheet integration; the
//! formatted text is logged so it can be copied over by hand.

use async_trait::async_trait;
use meter_capture_core::ports::{PortResult, SpreadsheetExporter};
use tracing::info;

#[derive(Clone, Default)]
pub struct LogSpreadsheetAdapter;

#[async_trait]
impl SpreadsheetExporter for LogSpreadsheetAdapter {
    async fn export(&self, formatted: &str) -> PortResult<()> {
        info!(chars = formatted.chars().count(), "Spreadsheet export skipped, no sheet configured");
        Ok(())
    }
}
