//! Terminal-side presentation state.

use crate::data::{temperature_hint, MetricKey, PerMetric, Status, TempHint, Tier};
use crate::sink::RenderSink;

/// Everything the dashboard has asked to be shown, kept until the next draw.
#[derive(Debug, Clone)]
pub struct ViewModel {
    /// Displayed gauge values, already clamped.
    pub gauges: PerMetric<f64>,
    /// History per metric, oldest first.
    pub charts: PerMetric<Vec<f64>>,
    pub statuses: PerMetric<Status>,
    pub details: PerMetric<Option<String>>,
    pub temperature_hint: TempHint,
    pub connected: bool,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self {
            gauges: PerMetric::filled(0.0),
            charts: PerMetric::from_fn(|_| Vec::new()),
            statuses: PerMetric::filled(Status {
                label: "Normal",
                tier: Tier::Normal,
            }),
            details: PerMetric::from_fn(|_| None),
            temperature_hint: temperature_hint(0.0),
            connected: false,
        }
    }
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Worst tier currently shown on any panel.
    pub fn worst_tier(&self) -> Tier {
        self.statuses
            .iter()
            .map(|(_, s)| s.tier)
            .max()
            .unwrap_or(Tier::Normal)
    }
}

impl RenderSink for ViewModel {
    fn render_gauge(&mut self, key: MetricKey, value: f64) {
        self.gauges[key] = value;
    }

    fn render_chart(&mut self, key: MetricKey, values: &[f64]) {
        let chart = &mut self.charts[key];
        chart.clear();
        chart.extend_from_slice(values);
    }

    fn set_connection_indicator(&mut self, connected: bool) {
        self.connected = connected;
    }

    fn set_status_label(&mut self, key: MetricKey, status: &Status) {
        self.statuses[key] = *status;
    }

    fn set_temperature_hint(&mut self, hint: &TempHint) {
        self.temperature_hint = *hint;
    }

    fn set_detail(&mut self, key: MetricKey, text: String) {
        self.details[key] = Some(text);
    }
}
