//! Application state and interaction logic.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::dashboard::Dashboard;
use crate::info::{HostInfo, InfoRequest};
use crate::source::{random_sample, ConnectionState, DataSource, FeedEvent};
use crate::ui::{Theme, ViewModel};

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub connection: ConnectionState,

    // Pipeline and what it has painted
    pub dashboard: Dashboard,
    pub view: ViewModel,

    // Host information header
    pub host: HostInfo,
    info_request: Option<InfoRequest>,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from `source`, with an auto-detected theme.
    pub fn new(source: Box<dyn DataSource>, dashboard: Dashboard) -> Self {
        Self::with_theme(source, dashboard, Theme::auto_detect())
    }

    pub fn with_theme(source: Box<dyn DataSource>, dashboard: Dashboard, theme: Theme) -> Self {
        let mut view = ViewModel::new();
        dashboard.prime(&mut view);
        Self {
            running: true,
            show_help: false,
            source,
            connection: ConnectionState::Connecting,
            dashboard,
            view,
            host: HostInfo::Pending,
            info_request: None,
            theme,
            status_message: None,
        }
    }

    /// Show host information from a background fetch once it completes.
    pub fn with_info(mut self, request: InfoRequest) -> Self {
        self.info_request = Some(request);
        self
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    pub fn last_error(&self) -> Option<String> {
        self.source.last_error()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    /// Drain every pending source event into the dashboard.
    ///
    /// Returns the number of events handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.source.poll() {
            handled += 1;
            match event {
                FeedEvent::State(state) => self.on_connection(state),
                FeedEvent::Sample(raw) => {
                    self.dashboard.on_sample(&raw, &mut self.view);
                }
            }
        }

        if let Some(host) = self.info_request.as_mut().and_then(InfoRequest::poll) {
            self.host = host;
            self.info_request = None;
        }

        handled
    }

    fn on_connection(&mut self, state: ConnectionState) {
        if state != self.connection {
            debug!("Connection state {:?} -> {:?}", self.connection, state);
        }
        self.connection = state;
        self.dashboard.on_connection(state, &mut self.view);
    }

    /// Advance the gauge animation by one frame.
    ///
    /// Returns whether another frame is needed.
    pub fn on_frame(&mut self) -> bool {
        self.dashboard.frame(&mut self.view)
    }

    pub fn is_animating(&self) -> bool {
        self.dashboard.is_animating()
    }

    /// Push a random sample through the pipeline, as if the feed had sent it.
    pub fn inject_synthetic(&mut self) {
        let raw = random_sample(&mut rand::rng());
        self.dashboard.on_sample(&raw, &mut self.view);
        self.set_status_message("Injected a random sample".to_string());
    }

    /// Drop the feed connection and open a fresh one.
    pub fn reconnect(&mut self) {
        info!("Manual reconnect requested");
        self.source.reconnect();
        self.set_status_message(format!("Reconnecting to {}", self.source.description()));
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit and close the source.
    pub fn quit(&mut self) {
        self.running = false;
        self.source.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MetricKey, Tier};
    use crate::source::ChannelSource;

    fn app() -> (tokio::sync::mpsc::Sender<String>, App) {
        let (tx, source) = ChannelSource::create("test");
        let app = App::with_theme(Box::new(source), Dashboard::default(), Theme::dark());
        (tx, app)
    }

    #[test]
    fn test_pump_routes_events() {
        let (tx, mut app) = app();
        assert!(!app.view.connected);

        tx.try_send(r#"{"cpu_usage": 85, "temperature": 62}"#.to_string())
            .unwrap();
        assert_eq!(app.pump(), 2);

        assert_eq!(app.connection, ConnectionState::Open);
        assert!(app.view.connected);
        assert_eq!(app.view.statuses[MetricKey::Load].tier, Tier::High);
        assert_eq!(app.view.temperature_hint.label, "Elevated temperature");
        assert!(app.is_animating());

        while app.on_frame() {}
        assert_eq!(app.view.gauges[MetricKey::Load], 85.0);
        assert_eq!(app.pump(), 0);
    }

    #[test]
    fn test_closed_source_turns_indicator_off() {
        let (tx, mut app) = app();
        app.pump();
        drop(tx);
        app.pump();

        assert_eq!(app.connection, ConnectionState::Closed);
        assert!(!app.view.connected);
        assert_eq!(app.last_error().as_deref(), Some("channel closed"));
    }

    #[test]
    fn test_inject_synthetic() {
        let (_tx, mut app) = app();
        app.inject_synthetic();

        assert!(app.dashboard.last_sample().is_some());
        assert!(app.is_animating());
        assert_eq!(app.get_status_message(), Some("Injected a random sample"));
    }

    #[test]
    fn test_quit() {
        let (_tx, mut app) = app();
        app.quit();
        assert!(!app.running);
    }
}
