use super::{LoopSession, TRACKING_PERIOD};
use crate::error::AttendanceError;
use crate::location::LocationProvider;
use crate::notifier::Notifier;
use crate::traits::display::StatusDisplay;
use crate::traits::server::AttendanceServer;
use crate::types::{LocationUpdate, Position};
use std::sync::Arc;

pub struct LocationReporter {
    inner: Arc<Reporter>,
    session: LoopSession,
}

struct Reporter {
    location: LocationProvider,
    server: Arc<dyn AttendanceServer>,
    status: Arc<dyn StatusDisplay>,
    notifier: Notifier,
}

impl LocationReporter {
    pub fn new(
        location: LocationProvider,
        server: Arc<dyn AttendanceServer>,
        status: Arc<dyn StatusDisplay>,
        notifier: Notifier,
    ) -> Self {
        Self {
            inner: Arc::new(Reporter {
                location,
                server,
                status,
                notifier,
            }),
            session: LoopSession::new("location-reporting"),
        }
    }

    /// Starts reporting for `bus_no`. A no-op returning `false` while a
    /// reporting loop is already running.
    pub fn start_tracking(&mut self, bus_no: impl Into<String>) -> bool {
        if self.session.is_running() {
            return false;
        }

        let bus_no: Arc<str> = Arc::from(bus_no.into());
        tracing::info!(bus_no = %bus_no, "Starting GPS tracking");
        self.inner.notifier.success("GPS Tracking Started");

        let inner = self.inner.clone();
        self.session.start(TRACKING_PERIOD, move || {
            let inner = inner.clone();
            let bus_no = bus_no.clone();
            async move { inner.tick(&bus_no).await }
        })
    }

    pub fn stop(&mut self) {
        self.session.stop();
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }
}

impl Reporter {
    async fn tick(&self, bus_no: &str) {
        if let Err(err) = self.report(bus_no).await {
            tracing::warn!(bus_no, error = %err, "GPS report failed");
            self.status.show_status(&format!("GPS Error: {err}"));
            self.notifier.error(format!("GPS Error: {err}"));
        }
    }

    async fn report(&self, bus_no: &str) -> Result<Position, AttendanceError> {
        let position = self.location.get_location().await?;
        self.status.show_status(&position.to_string());
        self.server
            .update_location(&LocationUpdate::new(bus_no, position))
            .await?;
        tracing::debug!(bus_no, ?position, "Location reported");
        Ok(position)
    }
}
