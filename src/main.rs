use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sysgauge::config::{Overrides, Settings};
use sysgauge::info::InfoRequest;
use sysgauge::source::{connector_for, FeedConnection};
use sysgauge::{events, ui, App, Dashboard};

/// Event poll timeout while the gauges are at rest.
const IDLE_POLL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "sysgauge")]
#[command(about = "Terminal dashboard for live hardware telemetry")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Feed address: http(s)://host/sse for Server-Sent Events or tcp://host:port
    #[arg(short, long)]
    feed: Option<String>,

    /// Host information endpoint
    #[arg(short, long, conflicts_with = "no_info")]
    info: Option<String>,

    /// Do not fetch host information
    #[arg(long)]
    no_info: bool,

    /// Delay before reconnecting after the feed drops (e.g. "3s", "500ms")
    #[arg(short, long)]
    reconnect_delay: Option<String>,

    /// Write logs to this file (the terminal belongs to the dashboard)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(ref path) = args.log_file {
        init_logging(path)?;
    }

    let overrides = Overrides {
        feed_url: args.feed,
        info_url: args.info,
        info_enabled: args.no_info.then_some(false),
        reconnect_delay: args.reconnect_delay,
    };
    let settings = Settings::load(args.config.as_deref(), &overrides)?;
    info!("Starting sysgauge with feed {}", settings.feed_url);

    // The feed and info fetch run here; the TUI stays on the main thread.
    let runtime = tokio::runtime::Runtime::new()?;

    let connector = connector_for(&settings.feed_url)?;
    let mut feed = FeedConnection::new(connector, settings.feed, runtime.handle().clone());
    feed.connect();

    let dashboard = Dashboard::new(settings.metrics, settings.history_depth, settings.ticks);
    let mut app = App::new(Box::new(feed), dashboard);
    if let Some(url) = settings.info_url.clone() {
        app = app.with_info(InfoRequest::spawn(url, runtime.handle()));
    }

    let result = run_tui(&mut app, settings.frame_interval());

    app.quit();
    runtime.shutdown_timeout(Duration::from_secs(1));
    result
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;
    Ok(())
}

/// Run the TUI until the user quits
fn run_tui(app: &mut App, frame_interval: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, app, frame_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    frame_interval: Duration,
) -> Result<()> {
    let mut last_frame = Instant::now();

    while app.running {
        app.pump();

        // Ticks are only scheduled while a gauge is still moving.
        if app.is_animating() && last_frame.elapsed() >= frame_interval {
            app.on_frame();
            last_frame = Instant::now();
        }

        terminal.draw(|frame| ui::draw(frame, app))?;

        let timeout = if app.is_animating() {
            frame_interval.saturating_sub(last_frame.elapsed())
        } else {
            IDLE_POLL
        };

        if let Some(Event::Key(key)) = events::poll_event(timeout)? {
            events::handle_key_event(app, key);
        }
    }

    Ok(())
}
