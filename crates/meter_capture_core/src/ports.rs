//! crates/meter_capture_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture: device
//! capabilities, the formatting endpoint, durable storage and the stubbed
//! notification/export collaborators all live behind them.

use crate::domain::{GeoPoint, PhotoKind, SessionData, Signature};
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., storage, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl From<serde_json::Error> for PortError {
    fn from(e: serde_json::Error) -> Self {
        PortError::Serialization(e.to_string())
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Storage and Delivery Ports
//=========================================================================================

/// Durable string key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` if the key was never set or has been removed.
    async fn get(&self, key: &str) -> PortResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> PortResult<()>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> PortResult<()>;
}

#[async_trait]
pub trait FormattingService: Send + Sync {
    /// Sends the session to the remote formatter and returns its formatted text.
    async fn format_session(&self, data: &SessionData) -> PortResult<String>;
}

#[async_trait]
pub trait SpreadsheetExporter: Send + Sync {
    async fn export(&self, formatted: &str) -> PortResult<()>;
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Tells the contact that their data has been exported.
    async fn notify_export(&self, email: &str) -> PortResult<()>;
}

//=========================================================================================
// Capture Ports
//=========================================================================================
// Each may fail with `PortError::PermissionDenied`, which callers surface as a
// warning rather than a failure.
//=========================================================================================

#[async_trait]
pub trait CameraService: Send + Sync {
    /// Takes a picture and returns its URI.
    async fn take_picture(&self, kind: PhotoKind) -> PortResult<String>;
}

#[async_trait]
pub trait LocationService: Send + Sync {
    async fn current_position(&self) -> PortResult<GeoPoint>;
}

#[async_trait]
pub trait BarcodeScanner: Send + Sync {
    /// Returns the decoded contents of the scanned code.
    async fn scan(&self) -> PortResult<String>;
}

#[async_trait]
pub trait SignaturePad: Send + Sync {
    async fn capture(&self) -> PortResult<Signature>;
}
