//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::display::SharedView;
use crate::poller::Poller;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Rendered dashboard, written by the poller
    pub view: SharedView,
    /// Poll loop, for statistics and readiness
    pub poller: Arc<Poller>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(view: SharedView, poller: Arc<Poller>) -> Self {
        Self {
            view,
            poller,
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
