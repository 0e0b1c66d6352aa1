use super::{LoopSession, ROTATION_PERIOD};
use crate::error::AttendanceError;
use crate::traits::display::CodeDisplay;
use crate::traits::server::AttendanceServer;
use crate::types::RotatingToken;
use std::sync::Arc;

pub struct TokenRotator {
    inner: Arc<Rotator>,
    session: LoopSession,
}

struct Rotator {
    server: Arc<dyn AttendanceServer>,
    display: Arc<dyn CodeDisplay>,
}

impl TokenRotator {
    pub fn new(server: Arc<dyn AttendanceServer>, display: Arc<dyn CodeDisplay>) -> Self {
        Self {
            inner: Arc::new(Rotator { server, display }),
            session: LoopSession::new("token-rotation"),
        }
    }

    /// Starts rotating. A no-op returning `false` while already running.
    pub fn start_rotation(&mut self) -> bool {
        let inner = self.inner.clone();
        self.session.start(ROTATION_PERIOD, move || {
            let inner = inner.clone();
            async move { inner.tick().await }
        })
    }

    pub fn stop(&mut self) {
        self.session.stop();
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }
}

impl Rotator {
    async fn tick(&self) {
        match self.rotate().await {
            Ok(token) => tracing::debug!(code = token.short_code(), "Token rotated"),
            Err(err) => tracing::warn!(error = %err, "Token rotation failed, keeping previous code"),
        }
    }

    async fn rotate(&self) -> Result<RotatingToken, AttendanceError> {
        let token = self.server.fetch_token().await?;
        // Clear and draw in one step so two codes are never on screen together.
        self.display.clear();
        self.display.render(&token);
        self.display.show_caption(&format!(
            "Refresh in {}s... Code: {}",
            ROTATION_PERIOD.as_secs(),
            token.short_code()
        ));
        Ok(token)
    }
}
