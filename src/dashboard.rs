//! The pipeline coordinator.
//!
//! A [`Dashboard`] owns every piece of per-session state: the rolling history,
//! the gauge animation and the last normalized sample. Feed events go in,
//! presentation updates come out through a [`RenderSink`]. Nothing here is
//! global, so several dashboards can run side by side.

use tracing::debug;

use crate::data::{
    classify, normalize, temperature_hint, AnimationDriver, HistoryBuffer, MetricConfig,
    MetricKey, MetricSample, PerMetric, RawSample, Status,
};
use crate::sink::RenderSink;
use crate::source::ConnectionState;

#[derive(Debug, Clone)]
pub struct Dashboard {
    configs: PerMetric<MetricConfig>,
    history: HistoryBuffer,
    driver: AnimationDriver,
    last: Option<MetricSample>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(
            PerMetric::default(),
            crate::data::history::DEFAULT_HISTORY_DEPTH,
            crate::data::animation::DEFAULT_TICKS,
        )
    }
}

impl Dashboard {
    /// Create a dashboard with `depth` history points per metric, reaching each
    /// new gauge target in `ticks` frames.
    pub fn new(configs: PerMetric<MetricConfig>, depth: usize, ticks: u32) -> Self {
        Self {
            configs,
            history: HistoryBuffer::new(depth),
            driver: AnimationDriver::new(configs, ticks),
            last: None,
        }
    }

    /// Paint the initial state: zeroed gauges and charts, indicator off.
    pub fn prime(&self, sink: &mut impl RenderSink) {
        sink.set_connection_indicator(false);
        for key in MetricKey::ALL {
            sink.render_gauge(key, self.driver.gauge(key).current);
            sink.render_chart(key, &self.history.snapshot(key));
        }
    }

    /// Route one raw sample through the pipeline.
    ///
    /// Returns `false` if the payload was dropped.
    pub fn on_sample(&mut self, raw: &RawSample, sink: &mut impl RenderSink) -> bool {
        let Some(sample) = normalize(raw) else {
            debug!("Dropping null sample");
            return false;
        };

        for key in MetricKey::ALL {
            let value = sample.value(key);
            self.history.push(key, value);
            self.driver.retarget(key, value);
            sink.set_status_label(key, &self.status(key, value));
            if let Some(detail) = sample.details.describe(key) {
                sink.set_detail(key, detail);
            }
        }
        sink.set_temperature_hint(&temperature_hint(sample.value(MetricKey::Temperature)));

        for key in MetricKey::ALL {
            sink.render_chart(key, &self.history.snapshot(key));
        }

        self.last = Some(sample);
        true
    }

    pub fn on_connection(&mut self, state: ConnectionState, sink: &mut impl RenderSink) {
        sink.set_connection_indicator(state.is_open());
    }

    /// Advance the gauge animation by one frame, if it is running.
    ///
    /// Returns whether another frame is needed.
    pub fn frame(&mut self, sink: &mut impl RenderSink) -> bool {
        if !self.driver.is_active() {
            return false;
        }
        self.driver.tick(sink)
    }

    pub fn is_animating(&self) -> bool {
        self.driver.is_active()
    }

    pub fn status(&self, key: MetricKey, value: f64) -> Status {
        classify(key, value, &self.configs[key].threshold)
    }

    pub fn last_sample(&self) -> Option<&MetricSample> {
        self.last.as_ref()
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    pub fn configs(&self) -> &PerMetric<MetricConfig> {
        &self.configs
    }
}
