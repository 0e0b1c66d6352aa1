//! Location Provider: one timeout-bound, high-accuracy fix per call.
//!
//! No retries happen here. The driver loop retries on its next tick; the student
//! restarts the whole attempt.

use crate::error::{LocationError, PositionErrorReason};
use crate::traits::position_source::{FixOptions, PositionSource};
use crate::types::Position;
use std::sync::Arc;
use std::time::Duration;

pub const FIX_TIMEOUT: Duration = Duration::from_millis(5000);

pub const FIX_OPTIONS: FixOptions = FixOptions {
    high_accuracy: true,
    timeout: FIX_TIMEOUT,
    maximum_age: Duration::ZERO,
};

#[derive(Clone)]
pub struct LocationProvider {
    source: Option<Arc<dyn PositionSource>>,
}

impl LocationProvider {
    pub fn new(source: Arc<dyn PositionSource>) -> Self {
        Self {
            source: Some(source),
        }
    }

    /// A provider for a platform without positioning; every call fails with
    /// [`LocationError::Unsupported`].
    pub fn unsupported() -> Self {
        Self { source: None }
    }

    pub fn is_supported(&self) -> bool {
        self.source.is_some()
    }

    pub async fn get_location(&self) -> Result<Position, LocationError> {
        let source = self.source.as_ref().ok_or(LocationError::Unsupported)?;

        let position = tokio::time::timeout(FIX_TIMEOUT, source.current_position(FIX_OPTIONS))
            .await
            .map_err(|_| LocationError::Position(PositionErrorReason::Timeout))??;

        if !position.is_valid() {
            tracing::warn!(?position, "Platform returned an out-of-range fix");
            return Err(LocationError::Position(PositionErrorReason::Unavailable));
        }
        Ok(position)
    }
}
