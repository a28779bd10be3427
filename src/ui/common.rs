//! Common UI components.
//!
//! This module contains the header bar, host information line, status bar and
//! help overlay.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::Tier;

/// Render the header bar.
///
/// Displays: connection indicator, overall severity, host name and uptime.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let fields = app.host.fields(Instant::now());
    let field = |label: &str| {
        fields
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    };

    let worst = app.view.worst_tier();
    let overall = match worst {
        Tier::Normal => Span::styled("all normal", theme.tier_style(worst)),
        _ => Span::styled(format!("{} alert", worst.symbol()), theme.tier_style(worst)),
    };

    let line = Line::from(vec![
        Span::styled(" ● ", theme.connection_style(app.view.connected)),
        Span::styled("SYSGAUGE ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("{} │ ", app.connection.label())),
        overall,
        Span::raw(" │ "),
        Span::raw(field("System")),
        Span::raw(" │ up "),
        Span::styled(field("Uptime"), Style::default().fg(theme.highlight)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the remaining host fields on one line.
pub fn render_host(frame: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let mut spans = vec![Span::raw(" ")];
    for (label, value) in app.host.fields(Instant::now()) {
        if label == "System" || label == "Uptime" {
            continue;
        }
        spans.push(Span::styled(format!("{} ", label), dim));
        spans.push(Span::raw(value));
        spans.push(Span::raw("  "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status bar at the bottom.
///
/// Shows the source, the last connection error while disconnected, and the
/// available controls. Temporary status messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = "r:refresh c:reconnect ?:help q:quit";
    let status = match (app.connection.is_open(), app.last_error()) {
        (false, Some(err)) => format!(" {} | {} | {}", app.source_description(), err, controls),
        _ => format!(" {} | {}", app.source_description(), controls),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the dashboard.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from("  r         Inject a random sample"),
        Line::from("  c         Reconnect the feed"),
        Line::from("  ?         Toggle this help"),
        Line::from("  Esc       Close help"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Tiers",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(vec![
            Span::styled("  OK   ", app.theme.tier_style(Tier::Normal)),
            Span::styled("HIGH   ", app.theme.tier_style(Tier::High)),
            Span::styled("CRIT", app.theme.tier_style(Tier::Danger)),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 40u16.min(area.width.saturating_sub(4));
    let help_height = 15u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
