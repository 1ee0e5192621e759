//! Chart Widgets
//!
//! Retained chart state: a type tag, axis labels, one or more named
//! series with styling hints, and axis-range hints. A chart is built once
//! and afterwards mutated in place; [`Chart::update`] is the redraw
//! request, which bumps the revision a display surface keys on.

use serde::{Deserialize, Serialize};

/// Chart type tag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
}

/// One x-axis label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Label {
    /// Formatted time of day
    Text(String),
    /// Sample position on an index axis
    Position(usize),
}

/// Styling hints for one series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStyle {
    pub border_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Dash pattern as `[dash, gap]` lengths; solid when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_dash: Option<Vec<u32>>,
    pub tension: f64,
    pub point_radius: f64,
}

impl SeriesStyle {
    pub fn new(border_color: impl Into<String>) -> Self {
        Self {
            border_color: border_color.into(),
            background_color: None,
            border_dash: None,
            tension: 0.0,
            point_radius: 3.0,
        }
    }

    /// Builder method: set fill colour
    pub fn fill(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    /// Builder method: set dash pattern
    pub fn dash(mut self, dash: u32, gap: u32) -> Self {
        self.border_dash = Some(vec![dash, gap]);
        self
    }

    /// Builder method: set line tension
    pub fn tension(mut self, tension: f64) -> Self {
        self.tension = tension;
        self
    }

    /// Builder method: set point radius
    pub fn point_radius(mut self, radius: f64) -> Self {
        self.point_radius = radius;
        self
    }
}

/// A named data series. `None` entries are empty placeholders that
/// leave a gap in the line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<Option<f64>>,
    #[serde(flatten)]
    pub style: SeriesStyle,
}

impl Dataset {
    pub fn new(label: impl Into<String>, data: Vec<Option<f64>>, style: SeriesStyle) -> Self {
        Self {
            label: label.into(),
            data,
            style,
        }
    }
}

/// Soft axis bounds; data outside the range still widens the axis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AxisRange {
    pub suggested_min: Option<f64>,
    pub suggested_max: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub show_legend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<AxisRange>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            responsive: true,
            show_legend: true,
            y_axis: None,
        }
    }
}

/// A retained chart widget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chart {
    pub kind: ChartKind,
    pub labels: Vec<Label>,
    pub datasets: Vec<Dataset>,
    pub options: ChartOptions,
    /// Number of redraws requested since construction
    pub revision: u64,
}

impl Chart {
    /// Create an empty chart of the given type
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            labels: Vec::new(),
            datasets: Vec::new(),
            options: ChartOptions::default(),
            revision: 0,
        }
    }

    /// Builder method: set axis labels
    pub fn labels(mut self, labels: Vec<Label>) -> Self {
        self.labels = labels;
        self
    }

    /// Builder method: append a series
    pub fn dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.push(dataset);
        self
    }

    /// Builder method: set soft y-axis bounds
    pub fn suggested_y(mut self, min: f64, max: f64) -> Self {
        self.options.y_axis = Some(AxisRange {
            suggested_min: Some(min),
            suggested_max: Some(max),
        });
        self
    }

    /// Replace the label array
    pub fn set_labels(&mut self, labels: Vec<Label>) {
        self.labels = labels;
    }

    /// Replace the values of the series at `index`. Returns false if
    /// there is no such series.
    pub fn set_data(&mut self, index: usize, data: Vec<Option<f64>>) -> bool {
        match self.datasets.get_mut(index) {
            Some(dataset) => {
                dataset.data = data;
                true
            }
            None => false,
        }
    }

    /// Request a redraw
    pub fn update(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }
}
