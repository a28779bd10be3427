//! Interpolated gauge animation.
//!
//! Each gauge moves from the value currently on screen toward the latest
//! known value in a fixed number of ticks. A new target always measures from
//! the displayed value, never from the previous target, so samples arriving
//! mid-animation neither overshoot nor jump.
//!
//! The driver does not own a timer. The frame loop calls [`AnimationDriver::tick`]
//! while [`AnimationDriver::is_active`] holds; once every gauge has settled the
//! loop stops ticking until the next [`AnimationDriver::retarget`].

use super::metric::{MetricConfig, MetricKey, PerMetric};
use crate::sink::RenderSink;

/// Default number of ticks a gauge takes to reach a new target.
pub const DEFAULT_TICKS: u32 = 60;

/// Distance below which a gauge snaps onto its target.
const SNAP_DISTANCE: f64 = 0.5;

/// Interpolation state of one gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeState {
    /// Value currently displayed.
    pub current: f64,
    /// Latest known true value.
    pub target: f64,
    /// Increment applied per tick.
    pub step: f64,
    /// Ticks left in the current budget.
    pub ticks_left: u32,
    pub settled: bool,
}

impl Default for GaugeState {
    fn default() -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            step: 0.0,
            ticks_left: 0,
            settled: true,
        }
    }
}

impl GaugeState {
    /// Advance one tick. Returns `true` once the gauge sits on its target.
    fn advance(&mut self) -> bool {
        if (self.target - self.current).abs() > SNAP_DISTANCE {
            self.current += self.step;
            self.ticks_left = self.ticks_left.saturating_sub(1);
            if self.ticks_left == 0 {
                self.current = self.target;
            }
        } else {
            self.current = self.target;
        }
        self.settled = self.current == self.target;
        self.settled
    }
}

/// Drives every gauge toward its target.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    gauges: PerMetric<GaugeState>,
    configs: PerMetric<MetricConfig>,
    ticks: u32,
}

impl AnimationDriver {
    /// Create a driver that reaches each new target in `ticks` ticks.
    ///
    /// A budget of zero is raised to one.
    pub fn new(configs: PerMetric<MetricConfig>, ticks: u32) -> Self {
        Self {
            gauges: PerMetric::filled(GaugeState::default()),
            configs,
            ticks: ticks.max(1),
        }
    }

    /// Point `key` at a new target, measuring from the displayed value.
    ///
    /// Always re-arms the gauge, even if it had settled.
    pub fn retarget(&mut self, key: MetricKey, target: f64) {
        let gauge = &mut self.gauges[key];
        gauge.target = target;
        gauge.step = (target - gauge.current) / f64::from(self.ticks);
        gauge.ticks_left = self.ticks;
        gauge.settled = false;
    }

    /// Advance every gauge one tick and paint it.
    ///
    /// Painted values are clamped into `[0, max]`; the stored state is not.
    /// Returns whether any gauge still needs ticks.
    pub fn tick(&mut self, sink: &mut impl RenderSink) -> bool {
        let mut complete = true;
        for (key, gauge) in self.gauges.iter_mut() {
            if !gauge.advance() {
                complete = false;
            }
            sink.render_gauge(key, self.configs[key].clamp(gauge.current));
        }
        !complete
    }

    /// Whether any gauge is still short of its target.
    pub fn is_active(&self) -> bool {
        self.gauges.iter().any(|(_, g)| !g.settled)
    }

    pub fn gauge(&self, key: MetricKey) -> &GaugeState {
        &self.gauges[key]
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }
}
