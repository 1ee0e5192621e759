//! Stateful dashboard controller

use std::sync::Arc;

use super::render::{self, GlucoseAxis, LabelZone, NOTIFICATION_SEPARATOR};
use super::{RenderError, RenderResult};
use crate::chart::{Chart, ChartKind, Dataset, SeriesStyle};
use crate::display::{ChartMount, DisplaySurface, Slot};
use crate::snapshot::Snapshot;

/// Glucose y-axis soft bounds (mmol/L)
const GLUCOSE_SUGGESTED_MIN: f64 = 3.0;
const GLUCOSE_SUGGESTED_MAX: f64 = 8.0;

/// What one render pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The fetch produced no data; nothing was touched
    NoData,
    /// The snapshot was rendered. `initialized` is true if the charts
    /// were built during this pass.
    Rendered { initialized: bool },
}

/// Holds the chart widgets for the lifetime of a dashboard session
pub struct DashboardController {
    surface: Arc<dyn DisplaySurface>,
    zone: LabelZone,
    glucose_chart: Option<Chart>,
    hormone_chart: Option<Chart>,
}

impl DashboardController {
    /// Create a controller with no charts built yet
    pub fn new(surface: Arc<dyn DisplaySurface>) -> Self {
        Self {
            surface,
            zone: LabelZone::default(),
            glucose_chart: None,
            hormone_chart: None,
        }
    }

    /// Builder method: set the time zone for axis labels
    pub fn label_zone(mut self, zone: LabelZone) -> Self {
        self.zone = zone;
        self
    }

    /// True once both charts exist
    pub fn is_initialized(&self) -> bool {
        self.glucose_chart.is_some() && self.hormone_chart.is_some()
    }

    pub fn glucose_chart(&self) -> Option<&Chart> {
        self.glucose_chart.as_ref()
    }

    pub fn hormone_chart(&self) -> Option<&Chart> {
        self.hormone_chart.as_ref()
    }

    /// Run the render half of a poll cycle
    ///
    /// Builds the charts if they are missing, then updates everything.
    /// `None` is the "no data" result of a failed fetch and leaves the
    /// dashboard untouched.
    pub fn render_cycle(&mut self, snapshot: Option<&Snapshot>) -> RenderResult<CycleOutcome> {
        let Some(snapshot) = snapshot else {
            return Ok(CycleOutcome::NoData);
        };

        let initialized = !self.is_initialized();
        if initialized {
            self.init_charts(snapshot);
        }
        self.update(Some(snapshot))?;

        Ok(CycleOutcome::Rendered { initialized })
    }

    /// Build both chart widgets from a snapshot and draw them
    pub fn init_charts(&mut self, snapshot: &Snapshot) {
        let axis = GlucoseAxis::build(&snapshot.glucose, self.zone);

        let glucose = Chart::new(ChartKind::Line)
            .labels(axis.labels)
            .dataset(Dataset::new(
                "Measured (mmol/L)",
                axis.measured,
                SeriesStyle::new("#0f766e")
                    .fill("rgba(15,118,110,0.06)")
                    .tension(0.25)
                    .point_radius(2.0),
            ))
            .dataset(Dataset::new(
                "Predicted",
                axis.predicted,
                SeriesStyle::new("#f59e0b")
                    .dash(6, 4)
                    .tension(0.25)
                    .point_radius(0.0),
            ))
            .suggested_y(GLUCOSE_SUGGESTED_MIN, GLUCOSE_SUGGESTED_MAX);

        let estradiol = &snapshot.hormone.estradiol;
        let hormone = Chart::new(ChartKind::Line)
            .labels(render::position_labels(estradiol.len()))
            .dataset(Dataset::new(
                "Estradiol (relative)",
                render::values(estradiol),
                SeriesStyle::new("#0369a1")
                    .fill("rgba(3,105,161,0.06)")
                    .tension(0.3)
                    .point_radius(2.0),
            ));

        self.surface.draw_chart(ChartMount::Glucose, &glucose);
        self.surface.draw_chart(ChartMount::Hormone, &hormone);

        tracing::info!(
            glucose_points = glucose.labels.len(),
            estradiol_points = hormone.labels.len(),
            "Dashboard charts initialized"
        );

        self.glucose_chart = Some(glucose);
        self.hormone_chart = Some(hormone);
    }

    /// Write a snapshot onto the dashboard
    ///
    /// Readouts are written first. An empty `history` or `predicted`
    /// sequence stops the update at that point; whatever was written
    /// before stays on screen.
    pub fn update(&mut self, snapshot: Option<&Snapshot>) -> RenderResult<()> {
        let Some(snapshot) = snapshot else {
            return Ok(());
        };
        let surface = Arc::clone(&self.surface);

        let current = snapshot
            .glucose
            .history
            .last()
            .ok_or(RenderError::EmptySeries("glucose.history"))?;
        surface.set_text(Slot::GlucoseCurrent, &render::fixed2(current.v));

        let predicted = snapshot
            .glucose
            .predicted
            .last()
            .ok_or(RenderError::EmptySeries("glucose.predicted"))?;
        surface.set_text(Slot::GlucosePredicted, &render::fixed2(predicted.v));

        if let Some(chart) = self.glucose_chart.as_mut() {
            let axis = GlucoseAxis::build(&snapshot.glucose, self.zone);
            chart.set_labels(axis.labels);
            chart.set_data(0, axis.measured);
            chart.set_data(1, axis.predicted);
            chart.update();
            surface.draw_chart(ChartMount::Glucose, chart);
        }

        // Hormone labels stay as built at init; only the values move.
        if let Some(chart) = self.hormone_chart.as_mut() {
            chart.set_data(0, render::values(&snapshot.hormone.estradiol));
            chart.update();
            surface.draw_chart(ChartMount::Hormone, chart);
        }

        let cycle = &snapshot.cycle;
        let controls = &snapshot.controls;
        surface.set_text(Slot::CyclePhase, &cycle.phase);
        surface.set_text(
            Slot::FertilityPct,
            &format!("{}%", render::js_number(cycle.fertility_pct)),
        );
        surface.set_text(Slot::Mood, &cycle.mood);
        surface.set_text(Slot::Mode, &controls.mode);
        surface.set_text(Slot::Basal, &render::js_number(controls.basal));
        surface.set_text(
            Slot::DextroseReserve,
            &format!("{} g", render::js_number(controls.dextrose_reserve_g)),
        );
        surface.set_text(
            Slot::Notifications,
            &snapshot.notifications.join(NOTIFICATION_SEPARATOR),
        );

        tracing::debug!(
            current = current.v,
            predicted = predicted.v,
            phase = %cycle.phase,
            "Dashboard updated"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Label;
    use crate::display::SharedView;
    use crate::snapshot::{scenario, Sample};

    fn controller() -> (DashboardController, SharedView) {
        let view = SharedView::new();
        let controller =
            DashboardController::new(Arc::new(view.clone())).label_zone(LabelZone::Utc);
        (controller, view)
    }

    #[test]
    fn test_end_to_end_scenario() {
        let (mut controller, view) = controller();

        let outcome = controller.render_cycle(Some(&scenario())).unwrap();
        assert_eq!(outcome, CycleOutcome::Rendered { initialized: true });

        let expected = [
            (Slot::GlucoseCurrent, "5.20"),
            (Slot::GlucosePredicted, "5.50"),
            (Slot::CyclePhase, "luteal"),
            (Slot::FertilityPct, "20%"),
            (Slot::Mood, "calm"),
            (Slot::Mode, "auto"),
            (Slot::Basal, "0.8"),
            (Slot::DextroseReserve, "15 g"),
            (Slot::Notifications, "low battery"),
        ];
        for (slot, text) in expected {
            assert_eq!(view.field(slot).as_deref(), Some(text), "slot {}", slot);
        }

        let glucose = view.chart(ChartMount::Glucose).unwrap();
        assert_eq!(glucose.labels.len(), 3);
        assert_eq!(glucose.datasets[0].data, vec![Some(5.0), Some(5.2), None]);
        assert_eq!(glucose.datasets[1].data, vec![None, None, Some(5.5)]);
        assert_eq!(glucose.datasets[1].style.border_dash, Some(vec![6, 4]));

        let hormone = view.chart(ChartMount::Hormone).unwrap();
        assert_eq!(hormone.labels, vec![Label::Position(0), Label::Position(1)]);
        assert_eq!(hormone.datasets[0].data, vec![Some(10.0), Some(12.0)]);
    }

    #[test]
    fn test_current_value_two_decimals() {
        let (mut controller, view) = controller();
        let mut snapshot = scenario();
        snapshot.glucose.history.push(Sample::at(90_000, 5.1));

        controller.render_cycle(Some(&snapshot)).unwrap();
        assert_eq!(view.field(Slot::GlucoseCurrent).as_deref(), Some("5.10"));
    }

    #[test]
    fn test_no_data_touches_nothing() {
        let (mut controller, view) = controller();

        for _ in 0..3 {
            assert_eq!(controller.render_cycle(None).unwrap(), CycleOutcome::NoData);
        }
        assert!(!controller.is_initialized());
        assert_eq!(view.revision(), 0);

        let outcome = controller.render_cycle(Some(&scenario())).unwrap();
        assert_eq!(outcome, CycleOutcome::Rendered { initialized: true });
        assert!(controller.is_initialized());
        assert_eq!(view.field(Slot::Mood).as_deref(), Some("calm"));
    }

    #[test]
    fn test_charts_built_once() {
        let (mut controller, _view) = controller();

        controller.render_cycle(Some(&scenario())).unwrap();
        let outcome = controller.render_cycle(Some(&scenario())).unwrap();
        assert_eq!(outcome, CycleOutcome::Rendered { initialized: false });

        // Init does not bump the revision; each update does.
        assert_eq!(controller.glucose_chart().unwrap().revision, 2);
        assert_eq!(controller.hormone_chart().unwrap().revision, 2);
    }

    #[test]
    fn test_hormone_labels_fixed_after_init() {
        let (mut controller, view) = controller();
        controller.render_cycle(Some(&scenario())).unwrap();

        let mut second = scenario();
        second.hormone.estradiol = (0..5).map(|i| Sample::untimed(i as f64)).collect();
        controller.render_cycle(Some(&second)).unwrap();

        let hormone = view.chart(ChartMount::Hormone).unwrap();
        assert_eq!(hormone.labels.len(), 2);
        assert_eq!(hormone.datasets[0].data.len(), 5);
    }

    #[test]
    fn test_glucose_axis_follows_each_snapshot() {
        let (mut controller, view) = controller();
        controller.render_cycle(Some(&scenario())).unwrap();

        let mut second = scenario();
        second.glucose.predicted.push(Sample::at(180_000, 5.9));
        controller.render_cycle(Some(&second)).unwrap();

        let glucose = view.chart(ChartMount::Glucose).unwrap();
        assert_eq!(glucose.labels.len(), 4);
        assert_eq!(glucose.datasets[1].data, vec![None, None, Some(5.5), Some(5.9)]);
        assert_eq!(view.field(Slot::GlucosePredicted).as_deref(), Some("5.90"));
    }

    #[test]
    fn test_empty_history_fails_before_any_write() {
        let (mut controller, view) = controller();
        let mut snapshot = scenario();
        snapshot.glucose.history.clear();

        let err = controller.render_cycle(Some(&snapshot)).unwrap_err();
        assert_eq!(err, RenderError::EmptySeries("glucose.history"));

        // Charts were still built from the (empty) history.
        assert!(controller.is_initialized());
        assert!(view.field(Slot::GlucoseCurrent).is_none());
        assert!(view.field(Slot::CyclePhase).is_none());
    }

    #[test]
    fn test_empty_predicted_keeps_current_readout() {
        let (mut controller, view) = controller();
        let mut snapshot = scenario();
        snapshot.glucose.predicted.clear();

        let err = controller.render_cycle(Some(&snapshot)).unwrap_err();
        assert_eq!(err, RenderError::EmptySeries("glucose.predicted"));
        assert_eq!(view.field(Slot::GlucoseCurrent).as_deref(), Some("5.20"));
        assert!(view.field(Slot::GlucosePredicted).is_none());
        assert!(view.field(Slot::Notifications).is_none());
    }

    #[test]
    fn test_notifications_joined() {
        let (mut controller, view) = controller();
        let mut snapshot = scenario();
        snapshot.notifications = vec!["low battery".into(), "sensor warming up".into()];

        controller.render_cycle(Some(&snapshot)).unwrap();
        assert_eq!(
            view.field(Slot::Notifications).as_deref(),
            Some("low battery • sensor warming up")
        );

        snapshot.notifications.clear();
        controller.render_cycle(Some(&snapshot)).unwrap();
        assert_eq!(view.field(Slot::Notifications).as_deref(), Some(""));
    }
}
