//! Channel-based data source.
//!
//! Frames are pushed by the caller instead of read from a socket. Useful for
//! embedding the dashboard next to an in-process producer, and for tests.

use tokio::sync::mpsc;

use super::{ConnectionState, DataSource, FeedEvent};
use crate::data::parse_frame;

const CHANNEL_BUFFER: usize = 64;

/// A data source that receives JSON frames via a channel.
///
/// The source reports itself open on the first poll and closed once every
/// sender has been dropped.
///
/// # Example
///
/// ```
/// use sysgauge::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("in-process");
/// tx.try_send(r#"{"cpu_usage": 45}"#.to_string()).unwrap();
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::Receiver<String>,
    description: String,
    state: Option<ConnectionState>,
}

impl ChannelSource {
    pub fn new(receiver: mpsc::Receiver<String>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
            state: None,
        }
    }

    /// Create a channel pair for pushing frames to a `ChannelSource`.
    pub fn create(source_description: &str) -> (mpsc::Sender<String>, Self) {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER);
        (tx, Self::new(rx, source_description))
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<FeedEvent> {
        if self.state.is_none() {
            self.state = Some(ConnectionState::Open);
            return Some(FeedEvent::State(ConnectionState::Open));
        }

        loop {
            match self.receiver.try_recv() {
                Ok(frame) => {
                    if let Some(raw) = parse_frame(&frame) {
                        return Some(FeedEvent::Sample(raw));
                    }
                }
                Err(mpsc::error::TryRecvError::Empty) => return None,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    if self.state == Some(ConnectionState::Closed) {
                        return None;
                    }
                    self.state = Some(ConnectionState::Closed);
                    return Some(FeedEvent::State(ConnectionState::Closed));
                }
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn last_error(&self) -> Option<String> {
        match self.state {
            Some(ConnectionState::Closed) => Some("channel closed".to_string()),
            _ => None,
        }
    }

    fn disconnect(&mut self) {
        self.receiver.close();
    }
}
