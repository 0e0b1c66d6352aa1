//! Verifier: one student attendance attempt.
//!
//! ```text
//! Idle ─open camera─▶ Scanning ─decode─▶ LocationPending ─fix─▶ Submitting ─reply─▶ Resolved
//! ```
//!
//! The camera failing to open, the capture stream closing without a code, and a
//! missing location all jump straight to `Resolved` with a failure.
//!
//! Every failure is terminal for the attempt. After success a full reload is
//! scheduled [`RESET_DELAY`] later; after failure the view waits for
//! [`Verifier::restart`].

use crate::device::DeviceProfile;
use crate::error::AttendanceError;
use crate::location::LocationProvider;
use crate::notifier::Notifier;
use crate::traits::display::ResultDisplay;
use crate::traits::scanner::{CodeScanner, DecodeEvent, ScanSettings};
use crate::traits::server::AttendanceServer;
use crate::types::{AttendanceSubmission, Position, RotatingToken};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

pub const RESET_DELAY: Duration = Duration::from_millis(2000);
pub const LOCATION_REQUIRED: &str =
    "Location required for attendance! Allow location access and try again.";
pub const SCANNED: &str = "QR Scanned! Verifying...";
pub const SCAN_ENDED: &str = "Scanning stopped before a QR code was read. Try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { message: String },
    Failure { message: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Outcome::Success { message } | Outcome::Failure { message } => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VerifierState {
    Idle,
    Scanning,
    LocationPending(RotatingToken),
    Submitting(AttendanceSubmission),
    Resolved(Outcome),
}

impl VerifierState {
    fn label(&self) -> &'static str {
        match self {
            VerifierState::Idle => "idle",
            VerifierState::Scanning => "scanning",
            VerifierState::LocationPending(_) => "location-pending",
            VerifierState::Submitting(_) => "submitting",
            VerifierState::Resolved(_) => "resolved",
        }
    }
}

pub struct Verifier {
    scanner: Arc<dyn CodeScanner>,
    location: LocationProvider,
    server: Arc<dyn AttendanceServer>,
    display: Arc<dyn ResultDisplay>,
    notifier: Notifier,
    device: DeviceProfile,
    settings: ScanSettings,
    state: VerifierState,
    pending_reset: Option<JoinHandle<()>>,
}

impl Verifier {
    pub fn new(
        scanner: Arc<dyn CodeScanner>,
        location: LocationProvider,
        server: Arc<dyn AttendanceServer>,
        display: Arc<dyn ResultDisplay>,
        notifier: Notifier,
        device: DeviceProfile,
    ) -> Self {
        Self {
            scanner,
            location,
            server,
            display,
            notifier,
            device,
            settings: ScanSettings::default(),
            state: VerifierState::Idle,
            pending_reset: None,
        }
    }

    pub fn state(&self) -> &VerifierState {
        &self.state
    }

    /// Takes the scheduled reload, if the last attempt succeeded and it has not
    /// been taken or cancelled yet.
    pub fn pending_reset(&mut self) -> Option<JoinHandle<()>> {
        self.pending_reset.take()
    }

    /// The explicit "Try Again" action. Only meaningful once resolved.
    pub fn restart(&mut self) -> bool {
        if !matches!(self.state, VerifierState::Resolved(_)) {
            return false;
        }
        if let Some(handle) = self.pending_reset.take() {
            handle.abort();
        }
        self.transition(VerifierState::Idle);
        true
    }

    /// Runs one attempt from `Idle` to `Resolved`.
    ///
    /// Fails only when called outside `Idle`: the capture session is exclusive.
    pub async fn run(&mut self) -> Result<Outcome, AttendanceError> {
        if !matches!(self.state, VerifierState::Idle) {
            return Err(AttendanceError::AcquisitionFailure(format!(
                "attendance attempt already {}",
                self.state.label()
            )));
        }

        let outcome = match self.scanner.open(self.settings).await {
            Err(err) => self.fail(format!("Camera Error: {err}")),
            Ok(events) => match self.scan(events).await {
                Some(token) => self.verify(token).await,
                None => self.fail(SCAN_ENDED.to_owned()),
            },
        };
        tracing::info!(
            success = outcome.is_success(),
            detail = outcome.message(),
            "Attendance attempt resolved"
        );
        self.transition(VerifierState::Resolved(outcome.clone()));
        Ok(outcome)
    }

    /// `None` when the capture stream closed before anything decoded.
    async fn scan(&mut self, mut events: UnboundedReceiver<DecodeEvent>) -> Option<RotatingToken> {
        self.transition(VerifierState::Scanning);

        let mut decoded = None;
        while let Some(event) = events.recv().await {
            match event {
                DecodeEvent::Decoded(payload) => {
                    decoded = Some(payload);
                    break;
                }
                DecodeEvent::Error(reason) => tracing::trace!(%reason, "Frame not decodable"),
            }
        }

        // Stop before anything else so later frames are never acted on.
        self.scanner.stop().await;
        self.scanner.hide();
        drop(events);

        let payload = decoded?;
        self.notifier.success(SCANNED);
        Some(RotatingToken::new(payload))
    }

    async fn verify(&mut self, token: RotatingToken) -> Outcome {
        self.transition(VerifierState::LocationPending(token.clone()));
        let position = match self.location.get_location().await {
            Ok(position) => position,
            Err(err) => {
                tracing::warn!(error = %err, "Location unavailable, discarding scanned token");
                return self.fail(LOCATION_REQUIRED.to_owned());
            }
        };
        self.submit(&token, position).await
    }

    async fn submit(&mut self, token: &RotatingToken, position: Position) -> Outcome {
        let submission = AttendanceSubmission::new(token, position, &self.device.identifier());
        self.transition(VerifierState::Submitting(submission.clone()));

        match self.server.mark_attendance(&submission).await {
            Ok(result) if result.is_success() => self.succeed(result.message),
            Ok(result) => self.fail(result.message),
            Err(err) => self.fail(err.to_string()),
        }
    }

    fn succeed(&mut self, message: String) -> Outcome {
        self.display.show_confirmation();
        self.notifier.success(message.clone());

        let display = self.display.clone();
        self.pending_reset = Some(tokio::spawn(async move {
            tokio::time::sleep(RESET_DELAY).await;
            display.reload();
        }));
        Outcome::Success { message }
    }

    fn fail(&mut self, message: String) -> Outcome {
        self.notifier.error(message.clone());
        self.display.show_failure(&message);
        Outcome::Failure { message }
    }

    fn transition(&mut self, next: VerifierState) {
        tracing::debug!(from = self.state.label(), to = next.label(), "Verifier transition");
        self.state = next;
    }
}
