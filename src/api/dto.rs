//! Data Transfer Objects
//!
//! Response types for the dashboard view endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::chart::Chart;

/// One text slot
#[derive(Debug, Serialize)]
pub struct FieldResponse {
    /// Slot id, e.g. `glucoseCurrent`
    pub id: String,
    pub text: String,
}

/// One chart at its mount point
#[derive(Debug, Serialize)]
pub struct ChartResponse {
    /// Mount id, e.g. `glucoseChart`
    pub id: String,
    pub chart: Chart,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, starting, degraded
    pub status: String,
    /// Whether the charts have been built
    pub charts_initialized: bool,
    /// Time of the last successful render
    pub last_render_at: Option<DateTime<Utc>>,
    /// Cycles since the last successful render
    pub consecutive_failures: u64,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
