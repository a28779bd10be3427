//! Data models and processing for telemetry samples.
//!
//! This module turns raw feed payloads into normalized samples, classifies
//! them, keeps their rolling history and animates the gauges toward them.
//!
//! ## Submodules
//!
//! - [`metric`]: Metric keys, per-key tables and display configuration
//! - [`normalize`]: Total mapping from a raw JSON payload to a [`MetricSample`]
//! - [`classify`]: Severity tiers and the temperature hint scale
//! - [`history`]: Fixed-depth rolling window per metric for the charts
//! - [`animation`]: Gauge interpolation toward the latest known value
//! - [`duration`]: Parsing configuration durations and formatting uptimes
//!
//! ## Data Flow
//!
//! ```text
//! RawSample (JSON)
//!        │
//!        ▼
//! normalize()
//!        │
//!        ├──▶ HistoryBuffer::push()        (charts)
//!        ├──▶ AnimationDriver::retarget()  (gauges)
//!        └──▶ classify() / temperature_hint()
//! ```

pub mod animation;
pub mod classify;
pub mod duration;
pub mod history;
pub mod metric;
pub mod normalize;

pub use animation::{AnimationDriver, GaugeState};
pub use classify::{classify, temperature_hint, ColorToken, Status, TempHint, Tier};
pub use history::HistoryBuffer;
pub use metric::{MetricConfig, MetricKey, PerMetric, Threshold};
pub use normalize::{normalize, parse_frame, MetricSample, RawSample, SampleDetails};
