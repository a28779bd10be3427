//! Layered configuration.
//!
//! Sources, lowest priority first: built-in defaults, an optional TOML file,
//! `SYSGAUGE_*` environment variables (nested keys joined with `__`, e.g.
//! `SYSGAUGE_FEED__URL`), then command-line overrides.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::animation::DEFAULT_TICKS;
use crate::data::duration::parse_duration;
use crate::data::history::{DEFAULT_HISTORY_DEPTH, MAX_HISTORY_DEPTH};
use crate::data::{MetricConfig, MetricKey, PerMetric, Threshold};
use crate::source::FeedSettings;

pub const DEFAULT_FEED_URL: &str = "http://127.0.0.1:8080/sse";
pub const DEFAULT_INFO_URL: &str = "http://127.0.0.1:8080/info";
pub const DEFAULT_FRAME_RATE: u32 = 60;

const ENV_PREFIX: &str = "SYSGAUGE";

/// Values given on the command line; `None` leaves the layered value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub feed_url: Option<String>,
    pub info_url: Option<String>,
    pub info_enabled: Option<bool>,
    pub reconnect_delay: Option<String>,
}

/// Validated runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub feed_url: String,
    pub feed: FeedSettings,
    /// `None` when the information endpoint is disabled.
    pub info_url: Option<String>,
    pub ticks: u32,
    pub frame_rate: u32,
    pub history_depth: usize,
    pub metrics: PerMetric<MetricConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            feed: FeedSettings::default(),
            info_url: Some(DEFAULT_INFO_URL.to_string()),
            ticks: DEFAULT_TICKS,
            frame_rate: DEFAULT_FRAME_RATE,
            history_depth: DEFAULT_HISTORY_DEPTH,
            metrics: PerMetric::default(),
        }
    }
}

impl Settings {
    /// Load settings from the process environment and an optional file.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        Self::load_from(path, None, overrides)
    }

    /// Like [`load`](Self::load), reading environment variables from `env`
    /// instead of the process when given.
    pub fn load_from(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
        overrides: &Overrides,
    ) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .set_override_option("feed.url", overrides.feed_url.clone())?
            .set_override_option("feed.reconnect_delay", overrides.reconnect_delay.clone())?
            .set_override_option("info.url", overrides.info_url.clone())?
            .set_override_option("info.enabled", overrides.info_enabled)?;

        let file: FileSettings = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        file.validate()
    }

    /// Delay between animation frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    feed: FeedSection,
    info: InfoSection,
    animation: AnimationSection,
    history: HistorySection,
    thresholds: ThresholdSection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct FeedSection {
    url: String,
    reconnect_delay: String,
    idle_timeout: String,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            reconnect_delay: "3s".to_string(),
            idle_timeout: "8s".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct InfoSection {
    url: String,
    enabled: bool,
}

impl Default for InfoSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_INFO_URL.to_string(),
            enabled: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct AnimationSection {
    ticks: u32,
    frame_rate: u32,
}

impl Default for AnimationSection {
    fn default() -> Self {
        Self {
            ticks: DEFAULT_TICKS,
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct HistorySection {
    depth: usize,
}

impl Default for HistorySection {
    fn default() -> Self {
        Self {
            depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ThresholdSection {
    load: Threshold,
    temperature: Threshold,
    memory: Threshold,
    storage: Threshold,
}

impl Default for ThresholdSection {
    fn default() -> Self {
        Self {
            load: MetricConfig::for_key(MetricKey::Load).threshold,
            temperature: MetricConfig::for_key(MetricKey::Temperature).threshold,
            memory: MetricConfig::for_key(MetricKey::Memory).threshold,
            storage: MetricConfig::for_key(MetricKey::Storage).threshold,
        }
    }
}

impl ThresholdSection {
    fn get(&self, key: MetricKey) -> Threshold {
        match key {
            MetricKey::Load => self.load,
            MetricKey::Temperature => self.temperature,
            MetricKey::Memory => self.memory,
            MetricKey::Storage => self.storage,
        }
    }
}

impl FileSettings {
    fn validate(self) -> Result<Settings> {
        let reconnect_delay = parse_duration(&self.feed.reconnect_delay)
            .context("Invalid feed.reconnect_delay")?;
        let idle_timeout =
            parse_duration(&self.feed.idle_timeout).context("Invalid feed.idle_timeout")?;
        if idle_timeout.is_zero() {
            bail!("feed.idle_timeout must be greater than zero");
        }
        if self.animation.ticks == 0 {
            bail!("animation.ticks must be greater than zero");
        }
        if self.animation.frame_rate == 0 {
            bail!("animation.frame_rate must be greater than zero");
        }
        if self.history.depth == 0 || self.history.depth > MAX_HISTORY_DEPTH {
            bail!(
                "history.depth must be between 1 and {} (got {})",
                MAX_HISTORY_DEPTH,
                self.history.depth
            );
        }

        let mut metrics = PerMetric::<MetricConfig>::default();
        for (key, config) in metrics.iter_mut() {
            let threshold = self.thresholds.get(key);
            if threshold.high >= threshold.danger {
                bail!(
                    "thresholds.{}: high ({}) must be below danger ({})",
                    key.name(),
                    threshold.high,
                    threshold.danger
                );
            }
            config.threshold = threshold;
        }

        Ok(Settings {
            feed_url: self.feed.url,
            feed: FeedSettings {
                reconnect_delay,
                idle_timeout,
            },
            info_url: self.info.enabled.then_some(self.info.url),
            ticks: self.animation.ticks,
            frame_rate: self.animation.frame_rate,
            history_depth: self.history.depth,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load(toml: Option<&str>, env: &[(&str, &str)], overrides: &Overrides) -> Result<Settings> {
        let env = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        match toml {
            Some(toml) => {
                let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
                file.write_all(toml.as_bytes()).unwrap();
                Settings::load_from(Some(file.path()), Some(env), overrides)
            }
            None => Settings::load_from(None, Some(env), overrides),
        }
    }

    #[test]
    fn test_defaults() {
        let settings = load(None, &[], &Overrides::default()).unwrap();
        assert_eq!(settings.feed_url, DEFAULT_FEED_URL);
        assert_eq!(settings.feed.reconnect_delay, Duration::from_millis(3000));
        assert_eq!(settings.feed.idle_timeout, Duration::from_secs(8));
        assert_eq!(settings.info_url.as_deref(), Some(DEFAULT_INFO_URL));
        assert_eq!(settings.ticks, 60);
        assert_eq!(settings.history_depth, 20);
        assert_eq!(
            settings.metrics[MetricKey::Temperature].threshold,
            Threshold::new(65.0, 75.0)
        );
    }

    #[test]
    fn test_file_values() {
        let settings = load(
            Some(
                r#"
                [feed]
                url = "tcp://10.0.0.2:9000"
                reconnect_delay = "500ms"

                [info]
                enabled = false

                [animation]
                ticks = 30

                [thresholds.memory]
                high = 70.0
                danger = 85.0
                "#,
            ),
            &[],
            &Overrides::default(),
        )
        .unwrap();

        assert_eq!(settings.feed_url, "tcp://10.0.0.2:9000");
        assert_eq!(settings.feed.reconnect_delay, Duration::from_millis(500));
        assert_eq!(settings.feed.idle_timeout, Duration::from_secs(8));
        assert!(settings.info_url.is_none());
        assert_eq!(settings.ticks, 30);
        assert_eq!(
            settings.metrics[MetricKey::Memory].threshold,
            Threshold::new(70.0, 85.0)
        );
        assert_eq!(
            settings.metrics[MetricKey::Load].threshold,
            Threshold::new(80.0, 90.0)
        );
    }

    #[test]
    fn test_env_then_cli_precedence() {
        let toml = "[feed]\nurl = \"http://file/sse\"\n";
        let env = [
            ("SYSGAUGE_FEED__URL", "http://env/sse"),
            ("SYSGAUGE_HISTORY__DEPTH", "40"),
        ];

        let settings = load(Some(toml), &env, &Overrides::default()).unwrap();
        assert_eq!(settings.feed_url, "http://env/sse");
        assert_eq!(settings.history_depth, 40);

        let overrides = Overrides {
            feed_url: Some("http://cli/sse".to_string()),
            info_enabled: Some(false),
            ..Default::default()
        };
        let settings = load(Some(toml), &env, &overrides).unwrap();
        assert_eq!(settings.feed_url, "http://cli/sse");
        assert!(settings.info_url.is_none());
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(load(Some("[animation]\nticks = 0\n"), &[], &Overrides::default()).is_err());
        assert!(load(Some("[history]\ndepth = 0\n"), &[], &Overrides::default()).is_err());
        assert!(load(
            None,
            &[("SYSGAUGE_HISTORY__DEPTH", "40000")],
            &Overrides::default()
        )
        .is_err());
        assert!(load(
            Some("[thresholds.load]\nhigh = 90.0\ndanger = 90.0\n"),
            &[],
            &Overrides::default()
        )
        .is_err());

        let overrides = Overrides {
            reconnect_delay: Some("soon".to_string()),
            ..Default::default()
        };
        assert!(load(None, &[], &overrides).is_err());

        let overrides = Overrides {
            reconnect_delay: Some("1e300h".to_string()),
            ..Default::default()
        };
        assert!(load(None, &[], &overrides).is_err());
        assert!(load(
            Some("[feed]\nidle_timeout = \"1e300h\"\n"),
            &[],
            &Overrides::default()
        )
        .is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = Settings::load_from(
            Some(Path::new("/nonexistent/sysgauge.toml")),
            Some(config::Map::new()),
            &Overrides::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_frame_interval() {
        let settings = Settings {
            frame_rate: 50,
            ..Settings::default()
        };
        assert_eq!(settings.frame_interval(), Duration::from_millis(20));
    }
}
