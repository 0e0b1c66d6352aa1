//! Presentation surfaces.
//!
//! All methods are synchronous and infallible: the protocol pushes state out and
//! never waits on rendering.

use crate::types::RotatingToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

/// Single line of human-readable status (the driver's GPS readout).
pub trait StatusDisplay: Send + Sync {
    fn show_status(&self, text: &str);
}

/// Surface that renders a token as a scannable optical code.
pub trait CodeDisplay: Send + Sync {
    /// Removes whatever code is currently drawn.
    fn clear(&self);
    fn render(&self, token: &RotatingToken);
    fn show_caption(&self, text: &str);
}

/// Where the outcome of an attendance attempt is shown.
pub trait ResultDisplay: Send + Sync {
    fn show_confirmation(&self);
    /// Shows `message` together with a restart affordance.
    fn show_failure(&self, message: &str);
    /// Full reset of the client view, ready for a new attempt.
    fn reload(&self);
}

/// Container that toasts are appended to.
pub trait ToastSurface: Send + Sync {
    fn push(&self, id: u64, message: &str, severity: Severity);
    fn fade(&self, id: u64);
    fn remove(&self, id: u64);
}
