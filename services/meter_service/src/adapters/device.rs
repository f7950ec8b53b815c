//! services/meter_service/src/adapters/device.rs
//!
//! The capture ports, backed by what the mobile client reports. The client
//! owns the camera, GPS, scanner and signature pad; it performs the capture
//! and posts either the result or the fact that permission was refused.

use async_trait::async_trait;
use meter_capture_core::{
    domain::{GeoPoint, PhotoKind, Signature},
    ports::{
        BarcodeScanner, CameraService, LocationService, PortError, PortResult, SignaturePad,
    },
};
use serde::Deserialize;

/// `{"status": "granted", "value": ...}` or `{"status": "denied"}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum DeviceReport<T> {
    Granted(T),
    Denied,
}

impl<T: Clone> DeviceReport<T> {
    fn outcome(&self, device: &str) -> PortResult<T> {
        match self {
            DeviceReport::Granted(value) => Ok(value.clone()),
            DeviceReport::Denied => Err(PortError::PermissionDenied(format!(
                "the client reported no {} permission",
                device
            ))),
        }
    }
}

#[async_trait]
impl CameraService for DeviceReport<String> {
    async fn take_picture(&self, _kind: PhotoKind) -> PortResult<String> {
        self.outcome("camera")
    }
}

#[async_trait]
impl BarcodeScanner for DeviceReport<String> {
    async fn scan(&self) -> PortResult<String> {
        self.outcome("camera")
    }
}

#[async_trait]
impl LocationService for DeviceReport<GeoPoint> {
    async fn current_position(&self) -> PortResult<GeoPoint> {
        self.outcome("location")
    }
}

#[async_trait]
impl SignaturePad for DeviceReport<Signature> {
    async fn capture(&self) -> PortResult<Signature> {
        self.outcome("signature")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_parse_from_status_and_value() {
        let granted: DeviceReport<String> =
            serde_json::from_str(r#"{"status":"granted","value":"file:///a.jpg"}"#).unwrap();
        assert_eq!(granted, DeviceReport::Granted("file:///a.jpg".to_string()));

        let denied: DeviceReport<GeoPoint> = serde_json::from_str(r#"{"status":"denied"}"#).unwrap();
        assert_eq!(denied, DeviceReport::Denied);

        let point: DeviceReport<GeoPoint> = serde_json::from_str(
            r#"{"status":"granted","value":{"latitude":48.1,"longitude":11.6}}"#,
        )
        .unwrap();
        assert!(matches!(point, DeviceReport::Granted(p) if p.latitude == 48.1));
    }

    #[tokio::test]
    async fn denied_report_is_a_permission_error() {
        let report: DeviceReport<String> = DeviceReport::Denied;
        let err = report.take_picture(PhotoKind::MeterPhoto).await.unwrap_err();
        assert!(matches!(err, PortError::PermissionDenied(_)));
    }
}
