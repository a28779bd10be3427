//! Sample normalization.
//!
//! The agent's payload shape is producer-defined, so every field is treated as
//! optional. A field that is missing or not a JSON number reads as `0`; only a
//! `null` payload is rejected outright.

use serde_json::Value;
use tracing::warn;

use super::metric::{MetricKey, PerMetric};

/// A payload exactly as received from the feed.
pub type RawSample = Value;

/// Wire field carrying the value of each metric.
pub fn wire_field(key: MetricKey) -> &'static str {
    match key {
        MetricKey::Load => "cpu_usage",
        MetricKey::Temperature => "temperature",
        MetricKey::Memory => "memory_usage",
        MetricKey::Storage => "storage_usage",
    }
}

/// Informational fields shown next to the gauges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SampleDetails {
    pub frequency_mhz: f64,
    pub memory_used_mb: f64,
    pub memory_total_mb: f64,
    pub storage_used_gb: f64,
    pub storage_total_gb: f64,
}

impl SampleDetails {
    /// Detail line for a metric panel, if that metric has one.
    pub fn describe(&self, key: MetricKey) -> Option<String> {
        match key {
            MetricKey::Load => Some(format!("{} MHz", self.frequency_mhz)),
            MetricKey::Memory => Some(format!(
                "{} MB / {} MB",
                self.memory_used_mb, self.memory_total_mb
            )),
            MetricKey::Storage => Some(format!(
                "{:.1} GB / {:.1} GB",
                self.storage_used_gb, self.storage_total_gb
            )),
            MetricKey::Temperature => None,
        }
    }
}

/// Canonical record built from a [`RawSample`].
///
/// Values are stored as received, without clamping, so classification sees
/// the true reading even when it falls outside the rendered range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSample {
    pub values: PerMetric<f64>,
    pub details: SampleDetails,
}

impl MetricSample {
    pub fn value(&self, key: MetricKey) -> f64 {
        self.values[key]
    }
}

/// Map a raw payload onto a [`MetricSample`].
///
/// Returns `None` only for a `null` payload.
pub fn normalize(raw: &RawSample) -> Option<MetricSample> {
    if raw.is_null() {
        return None;
    }

    Some(MetricSample {
        values: PerMetric::from_fn(|key| number(raw, wire_field(key))),
        details: SampleDetails {
            frequency_mhz: number(raw, "cpu_frequency"),
            memory_used_mb: number(raw, "memory_used"),
            memory_total_mb: number(raw, "memory_total"),
            storage_used_gb: number(raw, "storage_used"),
            storage_total_gb: number(raw, "storage_total"),
        },
    })
}

/// Parse one inbound frame body.
///
/// Malformed JSON is logged and dropped; it never reaches the pipeline. A
/// number too large for `f64` (e.g. `1e400`) makes the whole body malformed,
/// so the other fields of that frame are lost with it.
pub fn parse_frame(body: &str) -> Option<RawSample> {
    match serde_json::from_str::<RawSample>(body.trim()) {
        Ok(raw) => Some(raw),
        Err(e) => {
            warn!("Discarding malformed frame: {}", e);
            None
        }
    }
}

// Non-objects and non-numbers both read as absent.
fn number(raw: &RawSample, field: &str) -> f64 {
    raw.get(field)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_full_payload() {
        let raw = json!({
            "cpu_usage": 45,
            "temperature": 72.5,
            "memory_usage": 60,
            "storage_usage": 30,
            "cpu_frequency": 1200,
            "memory_used": 512,
            "memory_total": 1000,
            "storage_used": 12.25,
            "storage_total": 32
        });

        let sample = normalize(&raw).unwrap();
        assert_eq!(sample.value(MetricKey::Load), 45.0);
        assert_eq!(sample.value(MetricKey::Temperature), 72.5);
        assert_eq!(sample.value(MetricKey::Memory), 60.0);
        assert_eq!(sample.value(MetricKey::Storage), 30.0);
        assert_eq!(sample.details.frequency_mhz, 1200.0);
        assert_eq!(sample.details.storage_used_gb, 12.25);
    }

    #[test]
    fn test_normalize_missing_fields_default_to_zero() {
        let sample = normalize(&json!({ "temperature": 50 })).unwrap();
        assert_eq!(sample.value(MetricKey::Temperature), 50.0);
        for key in [MetricKey::Load, MetricKey::Memory, MetricKey::Storage] {
            assert_eq!(sample.value(key), 0.0);
        }
        assert_eq!(sample.details, SampleDetails::default());
    }

    #[test]
    fn test_normalize_wrong_types_read_as_absent() {
        let raw = json!({
            "cpu_usage": "45",
            "temperature": null,
            "memory_usage": [60],
            "storage_usage": { "value": 30 },
            "cpu_frequency": true
        });
        let sample = normalize(&raw).unwrap();
        for key in MetricKey::ALL {
            assert_eq!(sample.value(key), 0.0);
        }
        assert_eq!(sample.details.frequency_mhz, 0.0);
    }

    #[test]
    fn test_normalize_non_object_payload() {
        for raw in [json!(42), json!("text"), json!([1, 2, 3]), json!({})] {
            let sample = normalize(&raw).unwrap();
            assert!(MetricKey::ALL.iter().all(|k| sample.value(*k) == 0.0));
        }
    }

    #[test]
    fn test_normalize_null_is_rejected() {
        assert!(normalize(&Value::Null).is_none());
    }

    #[test]
    fn test_normalize_keeps_out_of_range_values() {
        let sample = normalize(&json!({ "cpu_usage": 140, "memory_usage": -5 })).unwrap();
        assert_eq!(sample.value(MetricKey::Load), 140.0);
        assert_eq!(sample.value(MetricKey::Memory), -5.0);
    }

    #[test]
    fn test_parse_frame() {
        assert!(parse_frame(r#"{"cpu_usage": 1}"#).is_some());
        assert!(parse_frame("  {\"cpu_usage\": 1}\n").is_some());
        assert!(parse_frame("not valid json").is_none());
        assert!(parse_frame("").is_none());
    }

    #[test]
    fn test_parse_frame_overflowing_number_drops_frame() {
        assert!(parse_frame(r#"{"cpu_usage": 1e400, "temperature": 50}"#).is_none());
    }

    #[test]
    fn test_describe_details() {
        let details = SampleDetails {
            frequency_mhz: 1200.0,
            memory_used_mb: 512.0,
            memory_total_mb: 1000.0,
            storage_used_gb: 12.5,
            storage_total_gb: 32.0,
        };
        assert_eq!(details.describe(MetricKey::Load).unwrap(), "1200 MHz");
        assert_eq!(details.describe(MetricKey::Memory).unwrap(), "512 MB / 1000 MB");
        assert_eq!(details.describe(MetricKey::Storage).unwrap(), "12.5 GB / 32.0 GB");
        assert!(details.describe(MetricKey::Temperature).is_none());
    }
}
