//! Dashboard Controller
//!
//! Owns the two chart widgets and writes every snapshot onto a
//! [`DisplaySurface`]:
//!
//! - **init**: build the glucose and hormone charts from the first
//!   snapshot that arrives (once per session)
//! - **update**: rewrite readouts, chart data and text fields on every
//!   snapshot
//!
//! ```text
//! Snapshot ─┬─► charts missing? ─► init_charts ─┐
//!           └───────────────────────────────────┴─► update ─► surface
//! ```

mod controller;
pub mod render;

pub use controller::{CycleOutcome, DashboardController};
pub use render::{GlucoseAxis, LabelZone};

use thiserror::Error;

/// Errors raised while rendering a snapshot
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// A sequence whose last element is displayed was empty
    #[error("Snapshot sequence {0} is empty")]
    EmptySeries(&'static str),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
