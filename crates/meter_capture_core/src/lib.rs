pub mod controller;
pub mod coordinator;
pub mod domain;
pub mod persistence;
pub mod ports;
pub mod session;
pub mod store;

#[cfg(test)]
mod test_support;

pub use controller::{AppController, CaptureError};
pub use coordinator::{SubmissionCoordinator, SubmitError, SubmitReceipt};
pub use domain::{
    CompanyInfo, CompanyUpdate, ContactInfo, ContactUpdate, DraftUpdate, EnergyType, GeoPoint,
    MeterReading, NewUser, PhotoKind, SessionData, Signature, User,
};
pub use persistence::{SessionPersistence, OFFLINE_DATA_KEY, USER_KEY};
pub use ports::{
    BarcodeScanner, CameraService, FormattingService, KeyValueStore, LocationService,
    NotificationService, PortError, PortResult, SignaturePad, SpreadsheetExporter,
};
pub use session::{Session, SessionState};
pub use store::MeterRecordStore;
