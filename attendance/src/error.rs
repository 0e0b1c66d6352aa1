//! Attendance Error Types
//!
//! [`LocationError`] is what the Location Provider reports. [`AttendanceError`] is the
//! taxonomy every other operation returns: missing platform capability, failed
//! acquisition (position or camera), transport failure, and an explicit rejection
//! from the server.
//!
//! The repeating driver loops recover from every variant locally. The student's
//! Verifier treats every variant as terminal for the current attempt.

use thiserror::Error;

/// Why the platform could not produce a position fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionErrorReason {
    PermissionDenied,
    Timeout,
    Unavailable,
}

impl std::fmt::Display for PositionErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            PositionErrorReason::PermissionDenied => "User denied Geolocation",
            PositionErrorReason::Timeout => "Timeout expired",
            PositionErrorReason::Unavailable => "Position unavailable",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The platform exposes no positioning capability at all.
    #[error("Geolocation not supported")]
    Unsupported,
    /// A fix was requested but could not be obtained.
    #[error("{0}")]
    Position(PositionErrorReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttendanceError {
    /// The platform lacks positioning or a camera.
    #[error("{0} not supported")]
    UnsupportedCapability(String),
    /// Position denied or timed out, or the camera could not be opened.
    #[error("{0}")]
    AcquisitionFailure(String),
    /// The request was rejected at the transport level or never arrived.
    #[error("Network error: {0}")]
    NetworkFailure(String),
    /// A well-formed reply that says no.
    #[error("{0}")]
    ServerRejection(String),
}

impl From<LocationError> for AttendanceError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::Unsupported => AttendanceError::UnsupportedCapability("Geolocation".into()),
            LocationError::Position(reason) => AttendanceError::AcquisitionFailure(reason.to_string()),
        }
    }
}

impl From<reqwest::Error> for AttendanceError {
    fn from(err: reqwest::Error) -> Self {
        AttendanceError::NetworkFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_errors_map_onto_the_taxonomy() {
        assert_eq!(
            AttendanceError::from(LocationError::Unsupported),
            AttendanceError::UnsupportedCapability("Geolocation".into())
        );
        assert_eq!(
            AttendanceError::from(LocationError::Position(PositionErrorReason::Timeout)),
            AttendanceError::AcquisitionFailure("Timeout expired".into())
        );
    }

    #[test]
    fn display_keeps_the_underlying_reason() {
        let err: AttendanceError =
            LocationError::Position(PositionErrorReason::PermissionDenied).into();
        assert_eq!(err.to_string(), "User denied Geolocation");
        assert_eq!(
            AttendanceError::UnsupportedCapability("Camera".into()).to_string(),
            "Camera not supported"
        );
    }
}
