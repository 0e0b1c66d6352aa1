use crate::error::LocationError;
use crate::types::Position;
use async_trait::async_trait;
use std::time::Duration;

/// Parameters handed to the platform for a single fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the platform may return. Zero means always take a fresh one.
    pub maximum_age: Duration,
}

/// Platform positioning capability.
///
/// Implementations may honour `options.timeout` themselves; the
/// [`LocationProvider`](crate::location::LocationProvider) enforces it regardless.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_position(&self, options: FixOptions) -> Result<Position, LocationError>;
}
