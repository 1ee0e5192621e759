//! Dashboard Snapshot
//!
//! The decoded JSON document describing the whole dashboard at one point
//! in time. A fresh snapshot is decoded on every poll cycle and the
//! previous one is dropped; nothing is merged across cycles.
//!
//! ```text
//! {
//!   "glucose":  { "history": [{t, v}], "predicted": [{t, v}] },
//!   "hormone":  { "estradiol": [{t, v}] },
//!   "cycle":    { "phase", "fertility_pct", "mood" },
//!   "controls": { "mode", "basal", "dextrose_reserve_g" },
//!   "notifications": ["..."]
//! }
//! ```

mod types;

pub use types::{Controls, CycleInfo, GlucoseSeries, HormoneSeries, Sample, Snapshot, Timestamp};

/// Reference snapshot used across the crate's tests
#[cfg(test)]
pub(crate) fn scenario() -> Snapshot {
    serde_json::from_str(
        r#"{
            "glucose": {
                "history": [{"t": 0, "v": 5.0}, {"t": 60000, "v": 5.2}],
                "predicted": [{"t": 120000, "v": 5.5}]
            },
            "hormone": {"estradiol": [{"v": 10}, {"v": 12}]},
            "cycle": {"phase": "luteal", "fertility_pct": 20, "mood": "calm"},
            "controls": {"mode": "auto", "basal": 0.8, "dextrose_reserve_g": 15},
            "notifications": ["low battery"]
        }"#,
    )
    .expect("scenario snapshot decodes")
}
