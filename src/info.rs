//! Host information shown in the header.
//!
//! The agent serves a one-shot description of its host on a separate
//! endpoint. It is fetched once in the background; the feed never waits on it.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::data::duration::format_uptime;
use crate::error::Error;

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Shown for every field when the endpoint could not be read.
pub const UNAVAILABLE: &str = "N/A";

/// Body of the information endpoint. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SystemInfo {
    pub os: Option<String>,
    pub platform: Option<String>,
    pub kernel: Option<String>,
    pub uptime_seconds: Option<u64>,
    pub cpu_model: Option<String>,
    /// e.g. "4 Cores / 8 Threads"
    pub cpu_specs: Option<String>,
    pub mem_total_gb: Option<f64>,
    pub disk_total_gb: Option<f64>,
}

/// GET the information endpoint and decode it.
pub async fn fetch_system_info(url: &str) -> Result<SystemInfo, Error> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| Error::Connection(e.to_string()))?;

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(Error::Http(format!(
            "info endpoint returned status {}",
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| Error::Parse(e.to_string()))
}

/// What the header knows about the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostInfo {
    /// Fetch still in flight, or disabled.
    Pending,
    /// Fetch failed.
    Unavailable,
    Known {
        info: SystemInfo,
        /// Boot instant derived from the reported uptime at fetch time.
        booted: Instant,
    },
}

impl HostInfo {
    /// Anchor the reported uptime to `fetched_at`.
    pub fn from_info(info: SystemInfo, fetched_at: Instant) -> Self {
        let uptime = Duration::from_secs(info.uptime_seconds.unwrap_or(0));
        let booted = fetched_at.checked_sub(uptime).unwrap_or(fetched_at);
        HostInfo::Known { info, booted }
    }

    /// Labelled header fields, in display order.
    pub fn fields(&self, now: Instant) -> Vec<(&'static str, String)> {
        let HostInfo::Known { info, booted } = self else {
            let blank = match self {
                HostInfo::Pending => "…",
                _ => UNAVAILABLE,
            };
            return FIELD_LABELS
                .iter()
                .map(|label| (*label, blank.to_string()))
                .collect();
        };

        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| UNAVAILABLE.to_string());
        let gigabytes = |v: Option<f64>| {
            v.map(|gb| format!("{} GB", gb.round()))
                .unwrap_or_else(|| UNAVAILABLE.to_string())
        };
        let system = match (&info.os, &info.platform) {
            (Some(os), Some(platform)) => format!("{} {}", os, platform),
            (Some(one), None) | (None, Some(one)) => one.clone(),
            (None, None) => UNAVAILABLE.to_string(),
        };
        let uptime = match info.uptime_seconds {
            Some(_) => format_uptime(now.saturating_duration_since(*booted)),
            None => UNAVAILABLE.to_string(),
        };

        vec![
            ("System", system),
            ("Kernel", text(&info.kernel)),
            ("CPU", text(&info.cpu_model)),
            ("Cores", text(&info.cpu_specs)),
            ("Memory", gigabytes(info.mem_total_gb)),
            ("Disk", gigabytes(info.disk_total_gb)),
            ("Uptime", uptime),
        ]
    }
}

const FIELD_LABELS: [&str; 7] = ["System", "Kernel", "CPU", "Cores", "Memory", "Disk", "Uptime"];

/// A background fetch of the information endpoint.
#[derive(Debug)]
pub struct InfoRequest {
    receiver: Option<oneshot::Receiver<HostInfo>>,
}

impl InfoRequest {
    /// Start fetching `url` on `runtime`.
    pub fn spawn(url: String, runtime: &Handle) -> Self {
        let (tx, rx) = oneshot::channel();
        runtime.spawn(async move {
            let host = match fetch_system_info(&url).await {
                Ok(info) => {
                    info!("Fetched host information from {}", url);
                    HostInfo::from_info(info, Instant::now())
                }
                Err(e) => {
                    warn!("Failed to fetch host information from {}: {}", url, e);
                    HostInfo::Unavailable
                }
            };
            let _ = tx.send(host);
        });
        Self { receiver: Some(rx) }
    }

    /// Take the result once it is ready.
    pub fn poll(&mut self) -> Option<HostInfo> {
        let receiver = self.receiver.as_mut()?;
        match receiver.try_recv() {
            Ok(host) => {
                self.receiver = None;
                Some(host)
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.receiver = None;
                Some(HostInfo::Unavailable)
            }
        }
    }
}
