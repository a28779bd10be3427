//! Threshold-based status classification.
//!
//! Two independent scales live here: the three-tier severity used for every
//! metric's status label, and the coarser temperature hint shown on the
//! temperature panel. They have different breakpoints and are kept apart.

use super::metric::{MetricKey, Threshold};

/// Severity tier of a metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Normal,
    High,
    Danger,
}

impl Tier {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Tier::Normal => "OK",
            Tier::High => "HIGH",
            Tier::Danger => "CRIT",
        }
    }
}

/// Status label and tier for a metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub label: &'static str,
    pub tier: Tier,
}

/// Classify `value` against the metric's thresholds.
///
/// A value equal to a threshold falls into the lower tier.
pub fn classify(key: MetricKey, value: f64, threshold: &Threshold) -> Status {
    if value > threshold.danger {
        Status {
            label: "Danger",
            tier: Tier::Danger,
        }
    } else if value > threshold.high {
        let label = match key {
            MetricKey::Load => "High load",
            MetricKey::Temperature => "High temp",
            MetricKey::Memory | MetricKey::Storage => "High usage",
        };
        Status {
            label,
            tier: Tier::High,
        }
    } else {
        Status {
            label: "Normal",
            tier: Tier::Normal,
        }
    }
}

/// Colour token for the temperature hint; the theme maps it to a real colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorToken {
    Alarm,
    Warning,
    Neutral,
}

/// Descriptive temperature text shown under the temperature gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempHint {
    pub label: &'static str,
    pub color: ColorToken,
}

const OVERHEATING_ABOVE: f64 = 70.0;
const ELEVATED_ABOVE: f64 = 60.0;

/// Describe a temperature reading.
pub fn temperature_hint(celsius: f64) -> TempHint {
    if celsius > OVERHEATING_ABOVE {
        TempHint {
            label: "Overheating!",
            color: ColorToken::Alarm,
        }
    } else if celsius > ELEVATED_ABOVE {
        TempHint {
            label: "Elevated temperature",
            color: ColorToken::Warning,
        }
    } else {
        TempHint {
            label: "Temperature normal",
            color: ColorToken::Neutral,
        }
    }
}
