//! # Attendance Protocol
//!
//! Client side of the bus attendance system. Drivers broadcast their position and
//! a rotating token; students scan the token and submit it together with their own
//! position for a server-side geofence check.
//!
//! ## Key Concepts
//! - **LocationProvider**: single-shot, timeout-bound position fix shared by both roles.
//! - **LocationReporter / TokenRotator**: the driver's two repeating loops, each owned
//!   by a [`rotator::LoopSession`] that refuses to start twice.
//! - **Verifier**: the student's one-shot scan → locate → submit state machine.
//! - **Notifier**: fire-and-forget toasts.
//!
//! Every platform capability (positioning, camera, display surfaces, the server) is
//! injected through the traits in [`traits`], so the protocol runs headless in tests.

pub mod client;
pub mod device;
pub mod error;
pub mod location;
pub mod notifier;
pub mod rotator;
pub mod traits;
pub mod types;
pub mod verifier;

pub use error::{AttendanceError, LocationError, PositionErrorReason};
pub use types::{
    AttendanceResult, AttendanceSubmission, DeviceIdentifier, LocationUpdate, Position,
    ResultStatus, RotatingToken,
};
