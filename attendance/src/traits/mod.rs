//!
//! Traits Module
//!
//! The seams between the protocol and its platform. Implement these to run the
//! protocol against real hardware, a console, or test doubles.
//!
//! - [`position_source`]: the platform positioning capability.
//! - [`server`]: the three HTTP endpoints.
//! - [`display`]: status, optical-code, result and toast surfaces.
//! - [`scanner`]: the camera-driven decode session.

pub mod display;
pub mod position_source;
pub mod scanner;
pub mod server;

pub use display::{CodeDisplay, ResultDisplay, Severity, StatusDisplay, ToastSurface};
pub use position_source::{FixOptions, PositionSource};
pub use scanner::{CameraFacing, CodeScanner, DecodeEvent, ScanSettings};
pub use server::AttendanceServer;
