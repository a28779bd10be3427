//! Live feed connection with automatic recovery.
//!
//! A single supervisor task owns the connection. It walks the state machine
//!
//! ```text
//! Connecting ──▶ Open ──▶ Closed ──(reconnect delay)──▶ Connecting
//!      │                    ▲
//!      └── connect error ───┘
//! ```
//!
//! forever, publishing every transition and every decoded sample on a channel
//! that the UI drains with [`DataSource::poll`]. Because one loop holds at most
//! one pending sleep, closes can never stack reconnect attempts.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::frame::FrameDecoder;
use super::transport::{ByteStream, Connector};
use super::{ConnectionState, DataSource, FeedEvent};
use crate::data::parse_frame;
use crate::error::Error;

/// Default delay between a close and the next connection attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(3000);

/// Default silence after which an open connection is considered dead.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(8);

const EVENT_BUFFER: usize = 64;

/// Timing policy of a [`FeedConnection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSettings {
    pub reconnect_delay: Duration,
    pub idle_timeout: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

/// A self-healing connection to the telemetry agent.
///
/// # Example
///
/// ```no_run
/// use sysgauge::source::{connector_for, FeedConnection, FeedSettings};
/// use sysgauge::DataSource;
///
/// # tokio_test::block_on(async {
/// let connector = connector_for("http://127.0.0.1:8080/sse").unwrap();
/// let mut feed = FeedConnection::new(connector, FeedSettings::default(), tokio::runtime::Handle::current());
/// feed.connect();
/// while let Some(event) = feed.poll() {
///     println!("{:?}", event);
/// }
/// # });
/// ```
#[derive(Debug)]
pub struct FeedConnection {
    connector: Arc<dyn Connector>,
    settings: FeedSettings,
    runtime: Handle,
    events_tx: mpsc::Sender<FeedEvent>,
    events_rx: mpsc::Receiver<FeedEvent>,
    task: Option<JoinHandle<()>>,
    state: ConnectionState,
    last_error: Arc<Mutex<Option<String>>>,
    description: String,
}

impl FeedConnection {
    /// Create an idle connection; nothing happens until [`connect`](Self::connect).
    pub fn new(connector: Arc<dyn Connector>, settings: FeedSettings, runtime: Handle) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let description = format!("feed: {}", connector.address());
        Self {
            connector,
            settings,
            runtime,
            events_tx,
            events_rx,
            task: None,
            state: ConnectionState::Closed,
            last_error: Arc::new(Mutex::new(None)),
            description,
        }
    }

    /// Start (or restart) the connection.
    ///
    /// Any previous connection is torn down first, so at most one is live.
    /// Events it queued but that were never polled are dropped.
    pub fn connect(&mut self) {
        self.teardown();

        let supervisor = Supervisor {
            connector: self.connector.clone(),
            settings: self.settings,
            events: self.events_tx.clone(),
            last_error: self.last_error.clone(),
        };
        self.task = Some(self.runtime.spawn(supervisor.run()));
    }

    /// Close the connection without scheduling a reconnect.
    pub fn disconnect(&mut self) {
        if self.teardown() {
            info!("Disconnected from {}", self.connector.address());
            // The channel is fresh after teardown, so this cannot be full.
            let _ = self.events_tx.try_send(FeedEvent::State(ConnectionState::Closed));
        }
        self.state = ConnectionState::Closed;
    }

    /// Last state drained through [`poll`](DataSource::poll).
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn settings(&self) -> FeedSettings {
        self.settings
    }

    /// Stop the running task and discard whatever it had queued.
    fn teardown(&mut self) -> bool {
        let Some(task) = self.task.take() else {
            return false;
        };
        task.abort();
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        self.events_tx = events_tx;
        self.events_rx = events_rx;
        true
    }
}

impl Drop for FeedConnection {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl DataSource for FeedConnection {
    fn poll(&mut self) -> Option<FeedEvent> {
        let event = self.events_rx.try_recv().ok()?;
        if let FeedEvent::State(state) = event {
            self.state = state;
        }
        Some(event)
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    fn reconnect(&mut self) {
        self.connect();
    }

    fn disconnect(&mut self) {
        FeedConnection::disconnect(self);
    }
}

/// Why an open stream stopped.
enum StreamEnd {
    /// The receiving side is gone; the supervisor should exit.
    Abandoned,
    Failed(Error),
}

/// State owned by the background task.
struct Supervisor {
    connector: Arc<dyn Connector>,
    settings: FeedSettings,
    events: mpsc::Sender<FeedEvent>,
    last_error: Arc<Mutex<Option<String>>>,
}

impl Supervisor {
    async fn run(self) {
        let address = self.connector.address().to_string();

        loop {
            if !self.publish(FeedEvent::State(ConnectionState::Connecting)).await {
                return;
            }
            debug!("Connecting to {}", address);

            let failure = match self.connector.connect().await {
                Ok(stream) => {
                    info!("Connected to {}", address);
                    *self.last_error.lock() = None;
                    if !self.publish(FeedEvent::State(ConnectionState::Open)).await {
                        return;
                    }
                    match self.pump(stream).await {
                        StreamEnd::Abandoned => return,
                        StreamEnd::Failed(e) => e,
                    }
                }
                Err(e) => e,
            };

            warn!("Feed {} closed: {}", address, failure);
            *self.last_error.lock() = Some(failure.to_string());
            if !self.publish(FeedEvent::State(ConnectionState::Closed)).await {
                return;
            }

            debug!("Reconnecting to {} in {:?}", address, self.settings.reconnect_delay);
            tokio::time::sleep(self.settings.reconnect_delay).await;
        }
    }

    /// Forward decoded samples until the stream ends, errors or goes quiet.
    async fn pump(&self, mut stream: ByteStream) -> StreamEnd {
        let mut decoder = FrameDecoder::new(self.connector.framing());
        let idle = self.settings.idle_timeout;

        loop {
            let chunk = match tokio::time::timeout(idle, stream.next()).await {
                Err(_) => return StreamEnd::Failed(Error::Timeout(idle)),
                Ok(None) => {
                    return StreamEnd::Failed(Error::Read("connection closed by peer".to_string()))
                }
                Ok(Some(Err(e))) => return StreamEnd::Failed(e),
                Ok(Some(Ok(chunk))) => chunk,
            };

            let frames = match decoder.push(&chunk) {
                Ok(frames) => frames,
                Err(e) => return StreamEnd::Failed(e),
            };
            for frame in frames {
                // A bad frame is dropped; the connection stays up.
                let Some(raw) = parse_frame(&frame) else {
                    continue;
                };
                if !self.publish(FeedEvent::Sample(raw)).await {
                    return StreamEnd::Abandoned;
                }
            }
        }
    }

    async fn publish(&self, event: FeedEvent) -> bool {
        self.events.send(event).await.is_ok()
    }
}
