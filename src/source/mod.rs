//! Data source abstraction for receiving telemetry samples.
//!
//! The TUI never blocks on the network: it drains a [`DataSource`] once per
//! frame. Sources report connection transitions and raw samples as
//! [`FeedEvent`]s; normalization happens downstream.

mod channel;
mod feed;
pub mod frame;
mod synthetic;
mod transport;

pub use channel::ChannelSource;
pub use feed::{FeedConnection, FeedSettings, DEFAULT_IDLE_TIMEOUT, DEFAULT_RECONNECT_DELAY};
pub use frame::{FrameDecoder, Framing};
pub use synthetic::random_sample;
pub use transport::{connector_for, ByteStream, Connector, SseConnector, TcpConnector};

use std::fmt::Debug;

use crate::data::RawSample;

/// Lifecycle of the feed connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    /// Whether the indicator should show the feed as live.
    pub fn is_open(self) -> bool {
        self == ConnectionState::Open
    }

    pub fn label(self) -> &'static str {
        match self {
            ConnectionState::Connecting => "Connecting",
            ConnectionState::Open => "Connected",
            ConnectionState::Closed => "Disconnected",
        }
    }
}

/// Something that happened on a source since the last poll.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    State(ConnectionState),
    Sample(RawSample),
}

/// Trait for receiving telemetry from various sources.
///
/// # Example
///
/// ```
/// use sysgauge::{ChannelSource, DataSource};
///
/// let (_tx, mut source) = ChannelSource::create("test");
/// while let Some(event) = source.poll() {
///     println!("{:?}", event);
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Take the next pending event.
    ///
    /// Returns `None` when nothing new has arrived. Must not block.
    fn poll(&mut self) -> Option<FeedEvent>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Reason the source last dropped, if it is currently failing.
    fn last_error(&self) -> Option<String>;

    /// Drop the current connection and open a new one.
    fn reconnect(&mut self) {}

    /// Close for good; no reconnect is scheduled.
    fn disconnect(&mut self) {}
}
