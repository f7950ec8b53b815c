//! crates/meter_capture_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! Field names serialize in camelCase so stored blobs keep the format the
//! mobile client already reads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to a user registered without one.
pub const DEFAULT_USER_NAME: &str = "Neuer Benutzer";
/// Email given to a user registered without one.
pub const DEFAULT_USER_EMAIL: &str = "benutzer@example.com";

const USER_CODE_LEN: usize = 8;

//=========================================================================================
// Session Header Data
//=========================================================================================

/// The company whose meters are being read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyInfo {
    pub name: String,
    pub street: String,
    pub street_number: String,
    pub zip_code: String,
    pub city: String,
}

/// The on-site contact person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// A single-field edit to [`CompanyInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum CompanyUpdate {
    Name(String),
    Street(String),
    StreetNumber(String),
    ZipCode(String),
    City(String),
}

impl CompanyInfo {
    pub fn apply(&mut self, update: CompanyUpdate) {
        match update {
            CompanyUpdate::Name(v) => self.name = v,
            CompanyUpdate::Street(v) => self.street = v,
            CompanyUpdate::StreetNumber(v) => self.street_number = v,
            CompanyUpdate::ZipCode(v) => self.zip_code = v,
            CompanyUpdate::City(v) => self.city = v,
        }
    }
}

/// A single-field edit to [`ContactInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum ContactUpdate {
    Name(String),
    Email(String),
    Phone(String),
}

impl ContactInfo {
    pub fn apply(&mut self, update: ContactUpdate) {
        match update {
            ContactUpdate::Name(v) => self.name = v,
            ContactUpdate::Email(v) => self.email = v,
            ContactUpdate::Phone(v) => self.phone = v,
        }
    }
}

//=========================================================================================
// Meters
//=========================================================================================

/// The kind of energy a meter measures. Serialized with the German labels
/// shown to operators; `Unset` serializes as the empty string and absorbs
/// labels this build does not know.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyType {
    #[serde(rename = "Strom")]
    Electricity,
    #[serde(rename = "Wärme")]
    Heat,
    #[serde(rename = "Wasser")]
    Water,
    #[default]
    #[serde(rename = "", other)]
    Unset,
}

impl EnergyType {
    pub fn label(&self) -> &'static str {
        match self {
            EnergyType::Electricity => "Strom",
            EnergyType::Heat => "Wärme",
            EnergyType::Water => "Wasser",
            EnergyType::Unset => "",
        }
    }
}

/// One captured meter. A default value is the empty draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeterReading {
    pub count: u32,
    /// `"<latitude>, <longitude>"`
    pub location: Option<String>,
    /// ISO-8601, set together with `location`.
    pub timestamp: Option<String>,
    pub meter_photo: Option<String>,
    pub distance_photo: Option<String>,
    pub scanned_code: Option<String>,
    pub energy_type: EnergyType,
}

/// A single-field edit to the draft meter. Values are taken as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum DraftUpdate {
    Count(u32),
    Location(Option<String>),
    Timestamp(Option<String>),
    MeterPhoto(Option<String>),
    DistancePhoto(Option<String>),
    ScannedCode(Option<String>),
    EnergyType(EnergyType),
}

impl MeterReading {
    pub fn apply(&mut self, update: DraftUpdate) {
        match update {
            DraftUpdate::Count(v) => self.count = v,
            DraftUpdate::Location(v) => self.location = v,
            DraftUpdate::Timestamp(v) => self.timestamp = v,
            DraftUpdate::MeterPhoto(v) => self.meter_photo = v,
            DraftUpdate::DistancePhoto(v) => self.distance_photo = v,
            DraftUpdate::ScannedCode(v) => self.scanned_code = v,
            DraftUpdate::EnergyType(v) => self.energy_type = v,
        }
    }

    /// True if this meter should appear in results for `query`.
    /// A meter without a scanned code never matches on the code.
    pub fn matches(&self, query: &str) -> bool {
        let code_match = self
            .scanned_code
            .as_deref()
            .is_some_and(|code| code.contains(query));
        code_match
            || self
                .energy_type
                .label()
                .to_lowercase()
                .contains(&query.to_lowercase())
    }
}

/// Which of the two meter photos a capture fills in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhotoKind {
    MeterPhoto,
    DistancePhoto,
}

/// A position fix from the location port.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// The `"lat, long"` form stored on a meter.
    pub fn to_location_string(&self) -> String {
        format!("{}, {}", self.latitude, self.longitude)
    }
}

/// An opaque signature blob from the signature pad (typically a data URI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(pub String);

//=========================================================================================
// Persisted Session Blob
//=========================================================================================

/// The part of a session that is sent for formatting and saved offline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionData {
    pub company_info: CompanyInfo,
    pub contact_info: ContactInfo,
    pub meters: Vec<MeterReading>,
}

//=========================================================================================
// Users
//=========================================================================================

/// The locally registered operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub code: String,
}

/// Registration input. Missing fields fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl User {
    pub fn register(new_user: NewUser) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: new_user
                .name
                .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
            email: new_user
                .email
                .unwrap_or_else(|| DEFAULT_USER_EMAIL.to_string()),
            code: generate_user_code(),
        }
    }
}

fn generate_user_code() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    raw[..USER_CODE_LEN].to_uppercase()
}
