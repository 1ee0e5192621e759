//! Display Surface
//!
//! The component's only contract with whatever presents the dashboard:
//! write formatted text into named slots and hand over charts for
//! drawing. The surface never lays anything out itself.
//!
//! [`SharedView`] is the in-process surface. It keeps the last written
//! value of every slot and the last drawn state of every chart, and is
//! what the HTTP view and the CLI read from.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use crate::chart::Chart;

/// Text-bearing slots, identified by their element id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    GlucoseCurrent,
    GlucosePredicted,
    CyclePhase,
    FertilityPct,
    Mood,
    Mode,
    Basal,
    DextroseReserve,
    Notifications,
}

impl Slot {
    pub const ALL: [Slot; 9] = [
        Slot::GlucoseCurrent,
        Slot::GlucosePredicted,
        Slot::CyclePhase,
        Slot::FertilityPct,
        Slot::Mood,
        Slot::Mode,
        Slot::Basal,
        Slot::DextroseReserve,
        Slot::Notifications,
    ];

    /// Element id of the slot
    pub fn id(&self) -> &'static str {
        match self {
            Slot::GlucoseCurrent => "glucoseCurrent",
            Slot::GlucosePredicted => "glucosePred",
            Slot::CyclePhase => "cyclePhase",
            Slot::FertilityPct => "fertilityPct",
            Slot::Mood => "moodLabel",
            Slot::Mode => "modeLabel",
            Slot::Basal => "basalLabel",
            Slot::DextroseReserve => "dextReserve",
            Slot::Notifications => "notificationsList",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Slot {
    type Err = UnknownId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Slot::ALL
            .into_iter()
            .find(|slot| slot.id() == s)
            .ok_or_else(|| UnknownId(s.to_string()))
    }
}

/// Chart mount points, identified by their element id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartMount {
    Glucose,
    Hormone,
}

impl ChartMount {
    pub const ALL: [ChartMount; 2] = [ChartMount::Glucose, ChartMount::Hormone];

    pub fn id(&self) -> &'static str {
        match self {
            ChartMount::Glucose => "glucoseChart",
            ChartMount::Hormone => "hormoneChart",
        }
    }
}

impl fmt::Display for ChartMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ChartMount {
    type Err = UnknownId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartMount::ALL
            .into_iter()
            .find(|mount| mount.id() == s)
            .ok_or_else(|| UnknownId(s.to_string()))
    }
}

/// An id that names no slot or mount
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown display id: {0}")]
pub struct UnknownId(pub String);

/// Something the dashboard can render into
pub trait DisplaySurface: Send + Sync {
    /// Replace the text of a slot
    fn set_text(&self, slot: Slot, text: &str);

    /// Draw (or redraw) the chart at a mount point
    fn draw_chart(&self, mount: ChartMount, chart: &Chart);
}

/// Everything currently on screen
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderedView {
    /// Slot id → text
    pub fields: BTreeMap<String, String>,
    /// Mount id → last drawn chart
    pub charts: BTreeMap<String, Chart>,
    /// Incremented on every write
    pub revision: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RenderedView {
    pub fn field(&self, slot: Slot) -> Option<&str> {
        self.fields.get(slot.id()).map(String::as_str)
    }

    pub fn chart(&self, mount: ChartMount) -> Option<&Chart> {
        self.charts.get(mount.id())
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.updated_at = Some(Utc::now());
    }
}

/// Cloneable handle to a [`RenderedView`]
#[derive(Debug, Clone, Default)]
pub struct SharedView {
    inner: Arc<RwLock<RenderedView>>,
}

impl SharedView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current view
    pub fn snapshot(&self) -> RenderedView {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn field(&self, slot: Slot) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .field(slot)
            .map(str::to_string)
    }

    pub fn chart(&self, mount: ChartMount) -> Option<Chart> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .chart(mount)
            .cloned()
    }

    pub fn revision(&self) -> u64 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .revision
    }
}

impl DisplaySurface for SharedView {
    fn set_text(&self, slot: Slot, text: &str) {
        let mut view = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        view.fields.insert(slot.id().to_string(), text.to_string());
        view.touch();
    }

    fn draw_chart(&self, mount: ChartMount, chart: &Chart) {
        let mut view = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        view.charts.insert(mount.id().to_string(), chart.clone());
        view.touch();
    }
}
