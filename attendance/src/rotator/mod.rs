//! Credential Rotator: the driver's two repeating loops.
//!
//! - [`LocationReporter`] reports the bus position every [`TRACKING_PERIOD`].
//! - [`TokenRotator`] replaces the displayed token every [`ROTATION_PERIOD`].
//!
//! A failed tick is reported and forgotten; the next tick starts from scratch.

mod session;
mod token;
mod tracking;

use std::time::Duration;

pub use session::LoopSession;
pub use token::TokenRotator;
pub use tracking::LocationReporter;

pub const TRACKING_PERIOD: Duration = Duration::from_secs(10);
pub const ROTATION_PERIOD: Duration = Duration::from_secs(10);
