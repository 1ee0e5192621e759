//! Snapshot types
//!
//! Field names follow the wire format exactly. Sequences are decoded
//! as-is: no sorting, no length checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One decoded snapshot payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub glucose: GlucoseSeries,
    pub hormone: HormoneSeries,
    pub cycle: CycleInfo,
    pub controls: Controls,
    pub notifications: Vec<String>,
}

/// Measured and forecast glucose samples
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlucoseSeries {
    /// Past measured values, oldest first
    pub history: Vec<Sample>,
    /// Forecast values continuing after `history`
    pub predicted: Vec<Sample>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HormoneSeries {
    pub estradiol: Vec<Sample>,
}

/// Menstrual cycle summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleInfo {
    pub phase: String,
    pub fertility_pct: f64,
    pub mood: String,
}

/// Pump/control settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Controls {
    pub mode: String,
    pub basal: f64,
    pub dextrose_reserve_g: f64,
}

/// A single `{t, v}` sample
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    /// Sample time; estradiol samples frequently omit it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<Timestamp>,
    pub v: f64,
}

impl Sample {
    /// Create a sample at the given epoch milliseconds
    pub fn at(millis: i64, v: f64) -> Self {
        Self {
            t: Some(Timestamp::Millis(millis as f64)),
            v,
        }
    }

    /// Create a sample without a timestamp
    pub fn untimed(v: f64) -> Self {
        Self { t: None, v }
    }

    /// Resolve the sample time, if present and representable
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.t.as_ref().and_then(Timestamp::to_datetime)
    }
}

/// Sample timestamp as it appears on the wire
///
/// Accepts epoch milliseconds (integer or fractional) or an RFC 3339
/// string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(f64),
    Text(String),
}

impl Timestamp {
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Millis(ms) if ms.is_finite() => {
                DateTime::from_timestamp_millis(ms.trunc() as i64)
            }
            Timestamp::Millis(_) => None,
            Timestamp::Text(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}
