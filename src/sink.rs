//! The paint-side interface of the pipeline.
//!
//! The dashboard pushes everything it wants shown through a [`RenderSink`] and
//! never reads visual state back. The terminal UI implements it with
//! [`ViewModel`](crate::ui::ViewModel); tests use a recording sink.

use crate::data::{MetricKey, Status, TempHint};

/// Consumer of presentation updates.
pub trait RenderSink {
    /// Paint a gauge. `value` is already clamped into the metric's range.
    fn render_gauge(&mut self, key: MetricKey, value: f64);

    /// Redraw a history chart from values ordered oldest first.
    fn render_chart(&mut self, key: MetricKey, values: &[f64]);

    fn set_connection_indicator(&mut self, connected: bool);

    fn set_status_label(&mut self, key: MetricKey, status: &Status);

    fn set_temperature_hint(&mut self, hint: &TempHint);

    /// Informational text for a metric panel (frequency, used/total capacity).
    fn set_detail(&mut self, key: MetricKey, text: String);
}
