use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Owns one repeating loop.
///
/// The first tick fires one full `period` after [`start`](Self::start). Ticks run
/// one after another on the same task, so a slow tick delays the next one instead
/// of overlapping it. Dropping the session stops the loop.
pub struct LoopSession {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl LoopSession {
    pub fn new(name: &'static str) -> Self {
        Self { name, handle: None }
    }

    /// Starts the loop. Returns `false`, and changes nothing, if it is already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F, Fut>(&mut self, period: Duration, mut tick: F) -> bool
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.is_running() {
            tracing::debug!(session = self.name, "Loop already running, ignoring start");
            return false;
        }

        let name = self.name;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                tracing::trace!(session = name, "tick");
                tick().await;
            }
        }));
        tracing::info!(session = self.name, ?period, "Loop started");
        true
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::info!(session = self.name, "Loop stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for LoopSession {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
