//! Metric keys and their per-key display configuration.
//!
//! The dashboard tracks a fixed set of four metrics. Everything that is kept
//! per metric (gauge state, history, status labels) is stored in a
//! [`PerMetric`] table indexed by [`MetricKey`].

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::Deserialize;

/// One of the fixed set of metrics shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKey {
    /// Processor load, percent.
    Load,
    /// Processor temperature, degrees Celsius.
    Temperature,
    /// Memory utilization, percent.
    Memory,
    /// Storage utilization, percent.
    Storage,
}

impl MetricKey {
    /// All keys in display order.
    pub const ALL: [MetricKey; 4] = [
        MetricKey::Load,
        MetricKey::Temperature,
        MetricKey::Memory,
        MetricKey::Storage,
    ];

    /// Position of this key in [`MetricKey::ALL`].
    pub fn index(self) -> usize {
        match self {
            MetricKey::Load => 0,
            MetricKey::Temperature => 1,
            MetricKey::Memory => 2,
            MetricKey::Storage => 3,
        }
    }

    /// Short machine name, also used in configuration tables.
    pub fn name(self) -> &'static str {
        match self {
            MetricKey::Load => "load",
            MetricKey::Temperature => "temperature",
            MetricKey::Memory => "memory",
            MetricKey::Storage => "storage",
        }
    }

    /// Panel title.
    pub fn title(self) -> &'static str {
        match self {
            MetricKey::Load => "Processor",
            MetricKey::Temperature => "Temperature",
            MetricKey::Memory => "Memory",
            MetricKey::Storage => "Storage",
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value of `T` for every [`MetricKey`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerMetric<T>([T; 4]);

impl<T> PerMetric<T> {
    /// Build a table by evaluating `f` for each key in order.
    pub fn from_fn(mut f: impl FnMut(MetricKey) -> T) -> Self {
        Self(MetricKey::ALL.map(&mut f))
    }

    /// A table holding a clone of `value` for every key.
    pub fn filled(value: T) -> Self
    where
        T: Clone,
    {
        Self::from_fn(|_| value.clone())
    }

    /// Iterate over `(key, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, &T)> {
        MetricKey::ALL.into_iter().zip(self.0.iter())
    }

    /// Iterate mutably over `(key, value)` pairs in display order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (MetricKey, &mut T)> {
        MetricKey::ALL.into_iter().zip(self.0.iter_mut())
    }
}

impl<T> Index<MetricKey> for PerMetric<T> {
    type Output = T;

    fn index(&self, key: MetricKey) -> &T {
        &self.0[key.index()]
    }
}

impl<T> IndexMut<MetricKey> for PerMetric<T> {
    fn index_mut(&mut self, key: MetricKey) -> &mut T {
        &mut self.0[key.index()]
    }
}

/// Tier boundaries for a metric. Both comparisons are strict greater-than.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Threshold {
    /// Values above this are in the high tier.
    pub high: f64,
    /// Values above this are in the danger tier.
    pub danger: f64,
}

impl Threshold {
    pub const fn new(high: f64, danger: f64) -> Self {
        Self { high, danger }
    }
}

/// Display configuration for one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricConfig {
    /// Upper bound of the rendered range.
    pub max: f64,
    /// Degrees per unit when drawn on a dial (3.6 maps 0–100 onto 0–360).
    pub factor: f64,
    /// Unit suffix shown after the value.
    pub unit: &'static str,
    pub threshold: Threshold,
}

impl MetricConfig {
    /// Built-in configuration for `key`.
    pub fn for_key(key: MetricKey) -> Self {
        let (unit, threshold) = match key {
            MetricKey::Temperature => ("℃", Threshold::new(65.0, 75.0)),
            MetricKey::Load | MetricKey::Memory | MetricKey::Storage => {
                ("%", Threshold::new(80.0, 90.0))
            }
        };
        Self {
            max: 100.0,
            factor: 3.6,
            unit,
            threshold,
        }
    }

    /// Clamp a stored value into the renderable range `[0, max]`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(0.0, self.max)
    }

    /// Dial angle in degrees for a value, after clamping.
    pub fn angle(&self, value: f64) -> f64 {
        self.clamp(value) * self.factor
    }

    /// Fraction of the rendered range covered by a value, in `[0, 1]`.
    pub fn ratio(&self, value: f64) -> f64 {
        if self.max > 0.0 {
            self.clamp(value) / self.max
        } else {
            0.0
        }
    }
}

impl Default for PerMetric<MetricConfig> {
    fn default() -> Self {
        PerMetric::from_fn(MetricConfig::for_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, key) in MetricKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }

    #[test]
    fn test_per_metric_from_fn() {
        let names = PerMetric::from_fn(|k| k.name());
        assert_eq!(names[MetricKey::Temperature], "temperature");
        assert_eq!(names.iter().count(), 4);
    }

    #[test]
    fn test_clamp_and_angle() {
        let config = MetricConfig::for_key(MetricKey::Load);
        assert_eq!(config.clamp(140.0), 100.0);
        assert_eq!(config.clamp(-3.0), 0.0);
        assert!((config.angle(50.0) - 180.0).abs() < 1e-9);
        assert!((config.angle(250.0) - 360.0).abs() < 1e-9);
        assert!((config.ratio(25.0) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_default_thresholds() {
        let configs = PerMetric::<MetricConfig>::default();
        assert_eq!(configs[MetricKey::Temperature].threshold, Threshold::new(65.0, 75.0));
        assert_eq!(configs[MetricKey::Storage].threshold, Threshold::new(80.0, 90.0));
        assert_eq!(configs[MetricKey::Temperature].unit, "℃");
    }
}
