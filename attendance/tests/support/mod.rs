#![allow(dead_code)]

use async_trait::async_trait;
use attendance::device::DeviceProfile;
use attendance::traits::{
    AttendanceServer, CodeDisplay, CodeScanner, DecodeEvent, FixOptions, PositionSource,
    ResultDisplay, ScanSettings, Severity, StatusDisplay, ToastSurface,
};
use attendance::{
    AttendanceError, AttendanceResult, AttendanceSubmission, LocationError, LocationUpdate,
    Position, RotatingToken,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Shared, ordered record of every collaborator call.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.entries().iter().filter(|e| e.starts_with(prefix)).count()
    }

    pub fn position_of(&self, prefix: &str) -> Option<usize> {
        self.entries().iter().position(|e| e.starts_with(prefix))
    }
}

pub fn student_device() -> DeviceProfile {
    DeviceProfile {
        user_agent: "Mozilla/5.0 (X11; Linux x86_64)".into(),
        language: "en-IN".into(),
        color_depth: 24,
        screen_width: 1920,
        screen_height: 1080,
        timezone_offset_minutes: -330,
    }
}

// ---------- position ----------

pub enum Fix {
    At(Position),
    Fails(LocationError),
    Never,
}

pub struct MockPosition {
    pub fix: Mutex<VecDeque<Fix>>,
    pub fallback: Fix,
    pub log: EventLog,
}

impl MockPosition {
    pub fn always(fix: Fix, log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            fix: Mutex::new(VecDeque::new()),
            fallback: fix,
            log: log.clone(),
        })
    }

    pub fn sequence(fixes: Vec<Fix>, fallback: Fix, log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            fix: Mutex::new(fixes.into()),
            fallback,
            log: log.clone(),
        })
    }
}

#[async_trait]
impl PositionSource for MockPosition {
    async fn current_position(&self, _: FixOptions) -> Result<Position, LocationError> {
        self.log.push("location.fix");
        let next = self.fix.lock().unwrap().pop_front();
        let result = match next.as_ref().unwrap_or(&self.fallback) {
            Fix::At(p) => Some(Ok(*p)),
            Fix::Fails(e) => Some(Err(*e)),
            Fix::Never => None,
        };
        match result {
            Some(result) => result,
            None => std::future::pending().await,
        }
    }
}

// ---------- server ----------

pub struct MockServer {
    pub log: EventLog,
    pub tokens: Mutex<VecDeque<Result<RotatingToken, AttendanceError>>>,
    pub update_fails: Mutex<VecDeque<bool>>,
    pub verdict: Mutex<Option<Result<AttendanceResult, AttendanceError>>>,
    pub updates: Mutex<Vec<LocationUpdate>>,
    pub submissions: Mutex<Vec<AttendanceSubmission>>,
}

impl MockServer {
    pub fn new(log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            log: log.clone(),
            tokens: Mutex::default(),
            update_fails: Mutex::default(),
            verdict: Mutex::new(None),
            updates: Mutex::default(),
            submissions: Mutex::default(),
        })
    }

    pub fn answering(log: &EventLog, verdict: Result<AttendanceResult, AttendanceError>) -> Arc<Self> {
        let server = Self::new(log);
        *server.verdict.lock().unwrap() = Some(verdict);
        server
    }
}

#[async_trait]
impl AttendanceServer for MockServer {
    async fn update_location(&self, update: &LocationUpdate) -> Result<(), AttendanceError> {
        self.log.push(format!("server.update:{}", update.bus_no));
        self.updates.lock().unwrap().push(update.clone());
        if self.update_fails.lock().unwrap().pop_front().unwrap_or(false) {
            return Err(AttendanceError::NetworkFailure("connection reset".into()));
        }
        Ok(())
    }

    async fn fetch_token(&self) -> Result<RotatingToken, AttendanceError> {
        self.log.push("server.token");
        self.tokens
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AttendanceError::NetworkFailure("no token queued".into())))
    }

    async fn mark_attendance(
        &self,
        submission: &AttendanceSubmission,
    ) -> Result<AttendanceResult, AttendanceError> {
        self.log.push(format!("server.mark:{}", submission.qr_data));
        self.submissions.lock().unwrap().push(submission.clone());
        self.verdict
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(AttendanceResult::success("OK")))
    }
}

// ---------- scanner ----------

pub struct MockScanner {
    pub log: EventLog,
    pub open_error: Option<AttendanceError>,
    pub frames: Vec<DecodeEvent>,
    pub keep_open: bool,
    /// Kept so the stream stays open after the queued frames, like a live camera.
    pub sender: Mutex<Option<mpsc::UnboundedSender<DecodeEvent>>>,
    pub settings: Mutex<Option<ScanSettings>>,
}

impl MockScanner {
    pub fn with_frames(frames: Vec<DecodeEvent>, log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            log: log.clone(),
            open_error: None,
            frames,
            keep_open: true,
            sender: Mutex::new(None),
            settings: Mutex::new(None),
        })
    }

    pub fn broken(error: AttendanceError, log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            log: log.clone(),
            open_error: Some(error),
            frames: Vec::new(),
            keep_open: true,
            sender: Mutex::new(None),
            settings: Mutex::new(None),
        })
    }

    /// Delivers `frames` and then ends the stream, like a camera that goes away.
    pub fn closing_after(frames: Vec<DecodeEvent>, log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            log: log.clone(),
            open_error: None,
            frames,
            keep_open: false,
            sender: Mutex::new(None),
            settings: Mutex::new(None),
        })
    }

    /// Simulates a frame arriving after the session was acted upon.
    pub fn late_frame(&self, payload: &str) -> bool {
        self.sender
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|tx| tx.send(DecodeEvent::Decoded(payload.into())).is_ok())
    }
}

#[async_trait]
impl CodeScanner for MockScanner {
    async fn open(
        &self,
        settings: ScanSettings,
    ) -> Result<mpsc::UnboundedReceiver<DecodeEvent>, AttendanceError> {
        self.log.push("scanner.open");
        *self.settings.lock().unwrap() = Some(settings);
        if let Some(err) = &self.open_error {
            return Err(err.clone());
        }
        let (tx, rx) = mpsc::unbounded_channel();
        for frame in &self.frames {
            let _ = tx.send(frame.clone());
        }
        if self.keep_open {
            *self.sender.lock().unwrap() = Some(tx);
        }
        Ok(rx)
    }

    async fn stop(&self) {
        self.log.push("scanner.stop");
    }

    fn hide(&self) {
        self.log.push("scanner.hide");
    }
}

// ---------- displays ----------

#[derive(Clone)]
pub struct RecordingDisplay {
    pub log: EventLog,
}

impl RecordingDisplay {
    pub fn new(log: &EventLog) -> Arc<Self> {
        Arc::new(Self { log: log.clone() })
    }
}

impl StatusDisplay for RecordingDisplay {
    fn show_status(&self, text: &str) {
        self.log.push(format!("status:{text}"));
    }
}

impl CodeDisplay for RecordingDisplay {
    fn clear(&self) {
        self.log.push("code.clear");
    }

    fn render(&self, token: &RotatingToken) {
        self.log.push(format!("code.render:{token}"));
    }

    fn show_caption(&self, text: &str) {
        self.log.push(format!("code.caption:{text}"));
    }
}

impl ResultDisplay for RecordingDisplay {
    fn show_confirmation(&self) {
        self.log.push("result.confirmation");
    }

    fn show_failure(&self, message: &str) {
        self.log.push(format!("result.failure:{message}"));
    }

    fn reload(&self) {
        self.log.push("result.reload");
    }
}

impl ToastSurface for RecordingDisplay {
    fn push(&self, _id: u64, message: &str, severity: Severity) {
        self.log.push(format!("toast.{}:{message}", severity.as_str()));
    }

    fn fade(&self, _id: u64) {}

    fn remove(&self, _id: u64) {}
}
