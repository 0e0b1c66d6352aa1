use crate::error::AttendanceError;
use crate::types::{AttendanceResult, AttendanceSubmission, LocationUpdate, RotatingToken};
use async_trait::async_trait;

/// The three server endpoints the client consumes.
///
/// A reply carrying `status != "success"` is returned as `Ok` with a failure
/// status, not as an error. Errors are reserved for transport problems.
#[async_trait]
pub trait AttendanceServer: Send + Sync {
    async fn update_location(&self, update: &LocationUpdate) -> Result<(), AttendanceError>;

    async fn fetch_token(&self) -> Result<RotatingToken, AttendanceError>;

    async fn mark_attendance(
        &self,
        submission: &AttendanceSubmission,
    ) -> Result<AttendanceResult, AttendanceError>;
}
