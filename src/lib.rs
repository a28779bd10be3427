//! # sysgauge
//!
//! A terminal dashboard and library for live hardware telemetry.
//!
//! A remote agent pushes samples of processor load, temperature, memory and
//! storage usage. This crate keeps the push connection alive, normalizes and
//! classifies every sample, animates four gauges toward the latest values and
//! draws a rolling history chart per metric.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐    ┌───────────┐    ┌──────────┐    ┌─────────┐ │
//! │  │   app   │───▶│ dashboard │───▶│ ViewModel│───▶│   ui    │ │
//! │  │ (state) │    │ (pipeline)│    │  (sink)  │    │(ratatui)│ │
//! │  └────┬────┘    └───────────┘    └──────────┘    └─────────┘ │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐                                                 │
//! │  │ source  │◀── FeedConnection (SSE | TCP) | ChannelSource   │
//! │  │ (input) │                                                 │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: The [`DataSource`] trait and the self-healing
//!   [`FeedConnection`](source::FeedConnection)
//! - **[`data`]**: Normalization, classification, rolling history and gauge
//!   animation
//! - **[`dashboard`]**: The [`Dashboard`] coordinator routing samples through
//!   the pipeline into a [`RenderSink`]
//! - **[`ui`]**: Terminal rendering and theme support
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Server-Sent Events feed (default http://127.0.0.1:8080/sse)
//! sysgauge --feed http://192.168.1.20:8080/sse
//!
//! # Newline-delimited JSON over TCP, no host information
//! sysgauge --feed tcp://192.168.1.20:9000 --no-info
//! ```
//!
//! ### As a library
//!
//! ```
//! use sysgauge::{ChannelSource, Dashboard, DataSource, FeedEvent, ViewModel};
//!
//! let (tx, mut source) = ChannelSource::create("in-process");
//! tx.try_send(r#"{"cpu_usage": 45, "temperature": 72}"#.to_string()).unwrap();
//!
//! let mut dashboard = Dashboard::default();
//! let mut view = ViewModel::new();
//! while let Some(event) = source.poll() {
//!     match event {
//!         FeedEvent::Sample(raw) => {
//!             dashboard.on_sample(&raw, &mut view);
//!         }
//!         FeedEvent::State(state) => dashboard.on_connection(state, &mut view),
//!     }
//! }
//! while dashboard.frame(&mut view) {}
//! assert_eq!(view.temperature_hint.label, "Overheating!");
//! ```

pub mod app;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod events;
pub mod info;
pub mod sink;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use dashboard::Dashboard;
pub use data::{
    classify, normalize, temperature_hint, HistoryBuffer, MetricKey, MetricSample, RawSample,
    Status, TempHint, Tier,
};
pub use error::Error;
pub use sink::RenderSink;
pub use source::{ChannelSource, ConnectionState, DataSource, FeedConnection, FeedEvent};
pub use ui::ViewModel;
