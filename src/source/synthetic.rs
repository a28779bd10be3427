//! Synthetic samples for the manual refresh key.

use rand::Rng;
use serde_json::json;

use crate::data::RawSample;

/// Build a plausible random payload in the agent's wire shape.
pub fn random_sample(rng: &mut impl Rng) -> RawSample {
    let memory_total = 1000;
    let storage_total = 32.0;

    json!({
        "cpu_usage": rng.random_range(0..=100),
        "temperature": rng.random_range(30..=100),
        "memory_usage": rng.random_range(0..=100),
        "storage_usage": rng.random_range(0..=100),
        "cpu_frequency": rng.random_range(800..1300),
        "memory_used": rng.random_range(200..memory_total),
        "memory_total": memory_total,
        "storage_used": rng.random_range(7.0..storage_total - 1.0),
        "storage_total": storage_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{normalize, MetricKey};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_sample_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let sample = normalize(&random_sample(&mut rng)).unwrap();
            for key in MetricKey::ALL {
                let v = sample.value(key);
                assert!((0.0..=100.0).contains(&v), "{} out of range: {}", key, v);
            }
            assert!(sample.value(MetricKey::Temperature) >= 30.0);
            assert!(sample.details.memory_used_mb < sample.details.memory_total_mb);
            assert!(sample.details.storage_used_gb < sample.details.storage_total_gb);
            assert!((800.0..1300.0).contains(&sample.details.frequency_mhz));
        }
    }
}
