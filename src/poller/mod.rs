//! Poll Scheduler
//!
//! Drives the fetch → init → update cycle on a fixed period.
//!
//! The first cycle runs as soon as the poller starts, then one per
//! `interval`. Two scheduling modes:
//!
//! - [`CycleMode::Serialized`]: the next cycle waits for the current one
//!   to finish. Ticks missed while a slow fetch is in flight are delayed,
//!   not replayed.
//! - [`CycleMode::Overlapping`]: every tick spawns its own cycle without
//!   waiting for earlier ones. A slow fetch can finish after a newer one
//!   and put older data back on screen.
//!
//! Rendering happens under the controller lock with no await inside, so
//! one snapshot is always written as a whole.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::dashboard::{CycleOutcome, DashboardController, RenderResult};
use crate::fetch::{fetch_snapshot, SnapshotSource};

/// How consecutive cycles relate to each other
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleMode {
    #[default]
    Serialized,
    Overlapping,
}

/// Scheduling settings
#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
    pub mode: CycleMode,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            mode: CycleMode::default(),
        }
    }
}

/// Counters describing the poller's history
#[derive(Debug, Clone, Default, Serialize)]
pub struct PollStats {
    pub cycles_started: u64,
    pub fetch_successes: u64,
    pub fetch_failures: u64,
    pub render_failures: u64,
    /// Cycles since the last successful render
    pub consecutive_failures: u64,
    pub charts_initialized_at: Option<DateTime<Utc>>,
    pub last_render_at: Option<DateTime<Utc>>,
}

/// Periodic fetch-and-render loop
pub struct Poller {
    source: Arc<dyn SnapshotSource>,
    controller: Arc<Mutex<DashboardController>>,
    config: PollerConfig,
    stats: RwLock<PollStats>,
    shutdown: watch::Sender<bool>,
}

impl Poller {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        controller: DashboardController,
        config: PollerConfig,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);

        Self {
            source,
            controller: Arc::new(Mutex::new(controller)),
            config,
            stats: RwLock::new(PollStats::default()),
            shutdown,
        }
    }

    /// Copy of the current counters
    pub fn stats(&self) -> PollStats {
        self.stats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// True once the charts have been built
    pub fn is_initialized(&self) -> bool {
        self.controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_initialized()
    }

    /// Run one cycle: fetch, then initialize if needed, then update
    ///
    /// Fetch failures come back as `Ok(CycleOutcome::NoData)`. A snapshot
    /// that cannot be rendered is logged and returned as the error.
    pub async fn run_cycle(&self) -> RenderResult<CycleOutcome> {
        let cycle = {
            let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
            stats.cycles_started += 1;
            stats.cycles_started
        };

        let snapshot = fetch_snapshot(self.source.as_ref()).await;

        let result = {
            let mut controller = self
                .controller
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            controller.render_cycle(snapshot.as_ref())
        };

        let now = Utc::now();
        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        if snapshot.is_some() {
            stats.fetch_successes += 1;
        } else {
            stats.fetch_failures += 1;
        }

        match &result {
            Ok(CycleOutcome::NoData) => {
                stats.consecutive_failures += 1;
                tracing::debug!(cycle, "Cycle skipped, no data");
            }
            Ok(CycleOutcome::Rendered { initialized }) => {
                if *initialized {
                    stats.charts_initialized_at = Some(now);
                }
                stats.last_render_at = Some(now);
                stats.consecutive_failures = 0;
                tracing::debug!(cycle, initialized, "Cycle rendered");
            }
            Err(e) => {
                stats.render_failures += 1;
                stats.consecutive_failures += 1;
                tracing::error!(cycle, error = %e, "Failed to render snapshot");
            }
        }

        result
    }

    /// Start the polling loop as a background task
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let poller = self;

        tokio::spawn(async move {
            let mut shutdown = poller.shutdown.subscribe();
            let mut interval = tokio::time::interval(poller.config.interval);
            interval.set_missed_tick_behavior(match poller.config.mode {
                CycleMode::Serialized => MissedTickBehavior::Delay,
                CycleMode::Overlapping => MissedTickBehavior::Burst,
            });

            tracing::info!(
                source = %poller.source.describe(),
                interval_ms = poller.config.interval.as_millis() as u64,
                mode = ?poller.config.mode,
                "Poller started"
            );

            loop {
                let stopping = *shutdown.borrow();
                if stopping {
                    break;
                }

                tokio::select! {
                    _ = interval.tick() => {}
                    _ = shutdown.changed() => break,
                }

                match poller.config.mode {
                    CycleMode::Serialized => {
                        // A hung fetch must not hold up shutdown
                        tokio::select! {
                            _ = poller.run_cycle() => {}
                            _ = shutdown.changed() => break,
                        }
                    }
                    CycleMode::Overlapping => {
                        let cycle = Arc::clone(&poller);
                        tokio::spawn(async move {
                            let _ = cycle.run_cycle().await;
                        });
                    }
                }
            }

            tracing::info!("Poller stopped");
        })
    }

    /// Ask the polling loop to exit
    ///
    /// A serialized cycle still waiting on its fetch is dropped. Cycles
    /// already spawned in overlapping mode run to completion.
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }
}
