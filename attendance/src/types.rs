//! Data model and wire shapes.
//!
//! Nothing here is persisted. A [`Position`] lives for one tick or one attempt, a
//! [`RotatingToken`] until the next rotation, and an [`AttendanceSubmission`] for a
//! single request.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic fix in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    /// Returns `None` unless both coordinates are finite and inside the
    /// standard latitude/longitude ranges.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let position = Self { latitude, longitude };
        position.is_valid().then_some(position)
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lat: {:.4}, Lng: {:.4}", self.latitude, self.longitude)
    }
}

/// Opaque short-lived credential minted by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RotatingToken(String);

impl RotatingToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-facing abbreviation: everything after the first `_`, or the whole
    /// token when it has no delimiter. Display only; the token is never parsed.
    pub fn short_code(&self) -> &str {
        self.0
            .split_once('_')
            .map(|(_, rest)| rest)
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for RotatingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Weak device fingerprint, see [`crate::device`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceIdentifier(String);

impl DeviceIdentifier {
    pub(crate) fn from_raw(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of the location-update endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub bus_no: String,
    pub lat: f64,
    pub lng: f64,
}

impl LocationUpdate {
    pub fn new(bus_no: impl Into<String>, position: Position) -> Self {
        Self {
            bus_no: bus_no.into(),
            lat: position.latitude,
            lng: position.longitude,
        }
    }
}

/// Reply of the token-fetch endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub qr_data: String,
}

/// Body of the attendance-marking endpoint. Built once per scan, sent once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSubmission {
    pub qr_data: String,
    pub lat: f64,
    pub lng: f64,
    pub device_id: String,
}

impl AttendanceSubmission {
    pub fn new(token: &RotatingToken, position: Position, device: &DeviceIdentifier) -> Self {
        Self {
            qr_data: token.as_str().to_owned(),
            lat: position.latitude,
            lng: position.longitude,
            device_id: device.as_str().to_owned(),
        }
    }

    pub fn position(&self) -> Position {
        Position {
            latitude: self.lat,
            longitude: self.lng,
        }
    }
}

/// Only the literal `"success"` counts as success; any other status string the
/// server sends ("failure", "error", ...) is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ResultStatus {
    Success,
    Failure,
}

impl From<String> for ResultStatus {
    fn from(raw: String) -> Self {
        if raw == "success" {
            ResultStatus::Success
        } else {
            ResultStatus::Failure
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceResult {
    pub status: ResultStatus,
    #[serde(default)]
    pub message: String,
}

impl AttendanceResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Failure,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }
}
