use crate::error::AttendanceError;
use async_trait::async_trait;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraFacing {
    User,
    Environment,
}

/// Capture parameters for an optical decode session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSettings {
    pub facing: CameraFacing,
    pub frames_per_second: u32,
    /// Edge length of the square decode region, in pixels.
    pub region_size: u32,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            facing: CameraFacing::Environment,
            frames_per_second: 10,
            region_size: 250,
        }
    }
}

/// One frame's worth of decoder output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeEvent {
    Decoded(String),
    /// The frame held nothing decodable. Expected on most frames.
    Error(String),
}

/// Camera-driven decode session. Only one session may be open at a time.
#[async_trait]
pub trait CodeScanner: Send + Sync {
    /// Opens the camera and starts decoding. Events arrive on the returned
    /// channel until [`stop`](Self::stop) is called or the receiver is dropped.
    async fn open(
        &self,
        settings: ScanSettings,
    ) -> Result<mpsc::UnboundedReceiver<DecodeEvent>, AttendanceError>;

    async fn stop(&self);

    fn hide(&self);
}
