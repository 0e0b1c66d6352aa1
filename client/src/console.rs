//! Terminal implementations of the attendance collaborators.
//!
//! The terminal has no camera and no GPS: scanned codes are typed or pasted on
//! stdin, and the position is whatever `FIXED_LATITUDE`/`FIXED_LONGITUDE` say.

use async_trait::async_trait;
use attendance::device::DeviceProfile;
use attendance::location::LocationProvider;
use attendance::traits::{
    CodeDisplay, CodeScanner, DecodeEvent, FixOptions, PositionSource, ResultDisplay,
    ScanSettings, Severity, StatusDisplay, ToastSurface,
};
use attendance::{AttendanceError, LocationError, Position, RotatingToken};
use chrono::{Local, Offset};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{Mutex as AsyncMutex, mpsc};
use tokio::task::JoinHandle;
use util::config;

/// Lines read from stdin, shared between the scanner and "press Enter" prompts.
pub type StdinLines = Arc<AsyncMutex<mpsc::UnboundedReceiver<String>>>;

/// Reads stdin on a background task for the rest of the process.
pub fn stdin_lines() -> StdinLines {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    Arc::new(AsyncMutex::new(rx))
}

/// Prints every surface to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct Console;

impl StatusDisplay for Console {
    fn show_status(&self, text: &str) {
        println!("[gps] {text}");
    }
}

impl CodeDisplay for Console {
    fn clear(&self) {
        println!();
    }

    fn render(&self, token: &RotatingToken) {
        println!("[code] {token}");
    }

    fn show_caption(&self, text: &str) {
        println!("       {text}");
    }
}

impl ResultDisplay for Console {
    fn show_confirmation(&self) {
        println!("[result] Attendance confirmed");
    }

    fn show_failure(&self, message: &str) {
        println!("[result] {message}");
        println!("         Press Enter to try again.");
    }

    fn reload(&self) {
        println!("[result] Ready for the next scan.");
    }
}

impl ToastSurface for Console {
    fn push(&self, id: u64, message: &str, severity: Severity) {
        println!("[{}] {message}", severity.as_str());
        tracing::trace!(id, "Toast shown");
    }

    fn fade(&self, id: u64) {
        tracing::trace!(id, "Toast fading");
    }

    fn remove(&self, id: u64) {
        tracing::trace!(id, "Toast removed");
    }
}

/// Always reports the same configured coordinates.
pub struct FixedPositionSource {
    position: Position,
}

#[async_trait]
impl PositionSource for FixedPositionSource {
    async fn current_position(&self, _options: FixOptions) -> Result<Position, LocationError> {
        Ok(self.position)
    }
}

/// Provider backed by the configured fixed position, or an unsupported one when
/// no valid position is configured.
pub fn location_provider() -> LocationProvider {
    match config::fixed_position().and_then(|(lat, lng)| Position::new(lat, lng)) {
        Some(position) => {
            tracing::info!(%position, "Using fixed position source");
            LocationProvider::new(Arc::new(FixedPositionSource { position }))
        }
        None => {
            tracing::warn!("No valid FIXED_LATITUDE/FIXED_LONGITUDE, positioning unavailable");
            LocationProvider::unsupported()
        }
    }
}

/// Treats every non-empty stdin line as a decoded code and every empty line as
/// a frame with nothing in it.
pub struct StdinScanner {
    lines: StdinLines,
    forwarder: Mutex<Option<JoinHandle<()>>>,
}

impl StdinScanner {
    pub fn new(lines: StdinLines) -> Self {
        Self {
            lines,
            forwarder: Mutex::new(None),
        }
    }
}

#[async_trait]
impl CodeScanner for StdinScanner {
    async fn open(
        &self,
        settings: ScanSettings,
    ) -> Result<mpsc::UnboundedReceiver<DecodeEvent>, AttendanceError> {
        let mut forwarder = self
            .forwarder
            .lock()
            .map_err(|_| AttendanceError::AcquisitionFailure("scanner lock poisoned".into()))?;
        if forwarder.as_ref().is_some_and(|h| !h.is_finished()) {
            return Err(AttendanceError::AcquisitionFailure(
                "a scan session is already open".into(),
            ));
        }

        tracing::debug!(?settings, "Opening stdin scanner");
        println!("[scan] Paste the code shown on the bus and press Enter.");

        let (tx, rx) = mpsc::unbounded_channel();
        let lines = self.lines.clone();
        *forwarder = Some(tokio::spawn(async move {
            let mut lines = lines.lock().await;
            while let Some(line) = lines.recv().await {
                let payload = line.trim();
                if payload.is_empty() {
                    if tx.send(DecodeEvent::Error("No code found in input".into())).is_err() {
                        break;
                    }
                    continue;
                }
                let _ = tx.send(DecodeEvent::Decoded(payload.to_owned()));
                break;
            }
        }));
        Ok(rx)
    }

    async fn stop(&self) {
        let handle = self.forwarder.lock().ok().and_then(|mut f| f.take());
        if let Some(handle) = handle {
            handle.abort();
        }
    }

    fn hide(&self) {
        tracing::debug!("Scanner hidden");
    }
}

/// Fingerprint attributes of this terminal.
pub fn device_profile() -> DeviceProfile {
    let (screen_width, screen_height) = config::device_screen();
    DeviceProfile {
        user_agent: format!(
            "bus-client/{} ({}; {})",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS,
            std::env::consts::ARCH
        ),
        language: config::device_language(),
        color_depth: config::device_color_depth(),
        screen_width,
        screen_height,
        timezone_offset_minutes: timezone_offset_minutes(Local::now().offset().fix().local_minus_utc()),
    }
}

/// Minutes to add to local time to get UTC, so zones east of UTC are negative.
fn timezone_offset_minutes(local_minus_utc_seconds: i32) -> i32 {
    -(local_minus_utc_seconds / 60)
}
