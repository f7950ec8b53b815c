//! Test doubles for the core ports.

use crate::domain::{GeoPoint, PhotoKind, SessionData, Signature};
use crate::ports::{
    BarcodeScanner, CameraService, FormattingService, KeyValueStore, LocationService,
    NotificationService, PortError, PortResult, SignaturePad, SpreadsheetExporter,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    read_only: bool,
}

impl MemoryStore {
    /// A store whose writes all fail.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Default::default()
        }
    }

    /// Puts a value in place without counting it as a write.
    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> PortResult<()> {
        if self.read_only {
            return Err(PortError::Unexpected("storage is read-only".to_string()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        self.check_writable()?;
        self.seed(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        self.check_writable()?;
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

pub struct FakeFormatter {
    response: Option<String>,
    calls: AtomicUsize,
    last_payload: Mutex<Option<SessionData>>,
}

impl FakeFormatter {
    pub fn succeeding(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            calls: AtomicUsize::new(0),
            last_payload: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            calls: AtomicUsize::new(0),
            last_payload: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_payload(&self) -> Option<SessionData> {
        self.last_payload.lock().unwrap().clone()
    }
}

#[async_trait]
impl FormattingService for FakeFormatter {
    async fn format_session(&self, data: &SessionData) -> PortResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_payload.lock().unwrap() = Some(data.clone());
        self.response
            .clone()
            .ok_or_else(|| PortError::Unexpected("endpoint unreachable".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingExporter {
    exported: Mutex<Vec<String>>,
}

impl RecordingExporter {
    pub fn exported(&self) -> Vec<String> {
        self.exported.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpreadsheetExporter for RecordingExporter {
    async fn export(&self, formatted: &str) -> PortResult<()> {
        self.exported.lock().unwrap().push(formatted.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationService for RecordingNotifier {
    async fn notify_export(&self, email: &str) -> PortResult<()> {
        if self.fail {
            return Err(PortError::Unexpected("mail relay down".to_string()));
        }
        self.sent.lock().unwrap().push(email.to_string());
        Ok(())
    }
}

/// Stands in for every capture device at once.
#[derive(Clone, Copy)]
pub enum FakeDevice {
    Granted,
    Denied,
    Broken,
}

impl FakeDevice {
    fn outcome<T>(&self, value: T) -> PortResult<T> {
        match self {
            FakeDevice::Granted => Ok(value),
            FakeDevice::Denied => Err(PortError::PermissionDenied("user declined".to_string())),
            FakeDevice::Broken => Err(PortError::Unexpected("device error".to_string())),
        }
    }
}

#[async_trait]
impl CameraService for FakeDevice {
    async fn take_picture(&self, kind: PhotoKind) -> PortResult<String> {
        let uri = match kind {
            PhotoKind::MeterPhoto => "file:///photos/meter.jpg",
            PhotoKind::DistancePhoto => "file:///photos/distance.jpg",
        };
        self.outcome(uri.to_string())
    }
}

#[async_trait]
impl LocationService for FakeDevice {
    async fn current_position(&self) -> PortResult<GeoPoint> {
        self.outcome(GeoPoint {
            latitude: 52.52,
            longitude: 13.405,
        })
    }
}

#[async_trait]
impl BarcodeScanner for FakeDevice {
    async fn scan(&self) -> PortResult<String> {
        self.outcome("M123".to_string())
    }
}

#[async_trait]
impl SignaturePad for FakeDevice {
    async fn capture(&self) -> PortResult<Signature> {
        self.outcome(Signature("data:image/png;base64,AA==".to_string()))
    }
}
