//! Fire-and-forget toasts.
//!
//! Each toast stays for [`VISIBLE_FOR`], fades, and is removed [`FADE_OUT`] later.
//! Toasts are independent; overlapping ones simply stack on the surface.

use crate::traits::display::{Severity, ToastSurface};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub const VISIBLE_FOR: Duration = Duration::from_millis(3000);
pub const FADE_OUT: Duration = Duration::from_millis(300);

#[derive(Clone, Default)]
pub struct Notifier {
    surface: Option<Arc<dyn ToastSurface>>,
    next_id: Arc<AtomicU64>,
}

impl Notifier {
    pub fn new(surface: Arc<dyn ToastSurface>) -> Self {
        Self {
            surface: Some(surface),
            next_id: Arc::default(),
        }
    }

    /// A notifier with nowhere to draw. Every call is a silent no-op.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn notify(&self, message: impl Into<String>, severity: Severity) {
        let Some(surface) = self.surface.clone() else {
            return;
        };
        let message = message.into();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        surface.push(id, &message, severity);

        // Removal needs a timer; outside a runtime the toast just stays.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(id, "No runtime for toast removal");
            return;
        };
        handle.spawn(async move {
            tokio::time::sleep(VISIBLE_FOR).await;
            surface.fade(id);
            tokio::time::sleep(FADE_OUT).await;
            surface.remove(id);
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(message, Severity::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(message, Severity::Error);
    }
}
