//! Terminal rendering using ratatui.
//!
//! ```text
//! ┌ header: connection │ severity │ host │ uptime ┐
//! │ host details                                  │
//! ├ Processor ┬ Temperature ┬ Memory ┬ Storage ───┤  gauges
//! ├ history   ┼ history     ┼ history┼ history ───┤  charts
//! └ status bar ───────────────────────────────────┘
//! ```

pub mod charts;
pub mod common;
pub mod gauges;
pub mod theme;
pub mod view;

pub use theme::Theme;
pub use view::ViewModel;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Minimum terminal size for usable display.
pub const MIN_WIDTH: u16 = 80;
pub const MIN_HEIGHT: u16 = 16;

/// Draw the whole dashboard.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.warning));
        let top = (area.height / 2).saturating_sub(2);
        let centered = Rect::new(0, top, area.width, 5u16.min(area.height - top));
        frame.render_widget(paragraph, centered);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1),                    // Header bar
        Constraint::Length(1),                    // Host details
        Constraint::Length(gauges::PANEL_HEIGHT), // Gauges
        Constraint::Min(6),                       // History charts
        Constraint::Length(1),                    // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_host(frame, app, chunks[1]);
    gauges::render(frame, app, chunks[2]);
    charts::render(frame, app, chunks[3]);
    common::render_status_bar(frame, app, chunks[4]);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Dashboard;
    use crate::source::ChannelSource;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App {
        let (_tx, source) = ChannelSource::create("test");
        App::with_theme(Box::new(source), Dashboard::default(), Theme::dark())
    }

    #[test]
    fn test_draws_every_panel() {
        let mut app = app();
        app.pump();
        let text = screen(&app, 120, 30);

        for title in ["Processor", "Temperature", "Memory", "Storage"] {
            assert!(text.contains(title), "missing panel {}", title);
        }
        assert!(text.contains("load history"));
        assert!(text.contains("Temperature normal"));
        assert!(text.contains("channel: test"));
    }

    #[test]
    fn test_too_small() {
        let app = app();
        let text = screen(&app, 40, 10);
        assert!(text.contains("Terminal too small"));
    }

    #[test]
    fn test_help_overlay() {
        let mut app = app();
        app.toggle_help();
        let text = screen(&app, 120, 30);
        assert!(text.contains("Keyboard Shortcuts"));
    }
}
