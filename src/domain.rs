use super::diagnostics::FieldWarning;
use chrono::{DateTime, FixedOffset, Utc};

/// A raw bulletin as delivered by the products API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "@id", default)]
    pub _id: String,
    #[serde(default)]
    pub id: String,
    #[serde(rename = "wmoCollectiveId", default)]
    pub wmo_collective_id: String,
    #[serde(rename = "issuingOffice")]
    pub issuing_office: String,
    #[serde(rename = "issuanceTime")]
    pub issuance_time: DateTime<Utc>,
    #[serde(rename = "productCode")]
    pub product_code: String,
    #[serde(rename = "productName")]
    pub product_name: String,
    #[serde(rename = "productText")]
    pub product_text: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f32,
    pub lon: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Magnitude {
    pub measured: bool,
    pub value: f32,
    pub units: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub time: String,
    pub degrees: u16,
    pub knots: u16,
    pub location: Coordinates,
}

/// Ordered boundary of a warning area; order defines the path.
pub type Polygon = Vec<Coordinates>;

/// The geometry and areas carried by a warning bulletin.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WarningDetails {
    pub movement: Option<Movement>,
    pub polygon: Polygon,
    pub issued_for: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<FieldWarning>,
}

/// A single event extracted from an LSR. Text fields are normalized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParsedEvent {
    pub event_type: String,
    pub reported_local: DateTime<FixedOffset>,
    pub reported: DateTime<Utc>,
    pub magnitude: Magnitude,
    pub point: Coordinates,
    pub location: String,
    pub county: String,
    pub state: String,
    pub source: String,
    pub remarks: String,

    pub code: String,
    pub issued: DateTime<Utc>,
    pub name: String,
    pub wfo: String,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<FieldWarning>,
}
