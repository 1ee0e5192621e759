//! # cycledash
//!
//! Glucose and cycle dashboard: polls a snapshot endpoint on a fixed
//! interval and renders two time-series charts plus a set of text
//! readouts.
//!
//! ## Modules
//!
//! - [`snapshot`]: The decoded snapshot document
//! - [`fetch`]: Snapshot sources (HTTP, file) and the fetch boundary
//! - [`chart`]: Retained chart widgets
//! - [`display`]: Display surface contract and the in-process view
//! - [`dashboard`]: Chart initialization and per-cycle updates
//! - [`poller`]: The periodic fetch-and-render loop
//! - [`api`]: Read-only HTTP view of the rendered dashboard
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cycledash::dashboard::DashboardController;
//! use cycledash::display::SharedView;
//! use cycledash::fetch::HttpSnapshotSource;
//! use cycledash::poller::{Poller, PollerConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let view = SharedView::new();
//!     let source = HttpSnapshotSource::new("http://localhost:8000/", "assets/mock-data.json", None)?;
//!     let controller = DashboardController::new(Arc::new(view.clone()));
//!
//!     let poller = Arc::new(Poller::new(Arc::new(source), controller, PollerConfig::default()));
//!     let handle = Arc::clone(&poller).start();
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(12)).await;
//!     println!("{:?}", view.snapshot().fields);
//!
//!     poller.stop();
//!     handle.await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod fetch;
pub mod logging;
pub mod poller;
pub mod snapshot;

// Re-export top-level types for convenience
pub use dashboard::{CycleOutcome, DashboardController, RenderError};
pub use display::{ChartMount, DisplaySurface, SharedView, Slot};
pub use fetch::{FetchError, SnapshotSource};
pub use poller::{CycleMode, PollStats, Poller};
pub use snapshot::Snapshot;
