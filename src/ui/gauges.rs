//! Gauge panels, one per metric.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::MetricKey;

/// Height of a gauge panel including borders.
pub const PANEL_HEIGHT: u16 = 6;

/// Render the four gauge panels side by side.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
    for (key, column) in MetricKey::ALL.into_iter().zip(columns.iter()) {
        render_panel(frame, app, key, *column);
    }
}

fn render_panel(frame: &mut Frame, app: &App, key: MetricKey, area: Rect) {
    let theme = &app.theme;
    let config = &app.dashboard.configs()[key];
    let value = app.view.gauges[key];
    let status = app.view.statuses[key];
    let tier_style = theme.tier_style(status.tier);

    let block = Block::default()
        .title(Span::styled(format!(" {} ", key.title()), theme.header))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([
        Constraint::Length(1), // gauge
        Constraint::Length(1), // status
        Constraint::Length(1), // detail or hint
        Constraint::Min(0),
    ])
    .split(inner);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.tier_color(status.tier)).bg(theme.track))
        .ratio(config.ratio(value))
        .label(format!("{:.1}{}", value, config.unit));
    frame.render_widget(gauge, rows[0]);

    let status_line = Line::from(vec![
        Span::styled(format!("{:<4} ", status.tier.symbol()), tier_style),
        Span::styled(status.label, tier_style),
    ]);
    frame.render_widget(Paragraph::new(status_line), rows[1]);

    let third = if key == MetricKey::Temperature {
        let hint = app.view.temperature_hint;
        Line::from(Span::styled(hint.label, theme.hint_style(hint.color)))
    } else {
        let detail = app.view.details[key].clone().unwrap_or_default();
        Line::from(Span::styled(
            detail,
            Style::default().add_modifier(Modifier::DIM),
        ))
    };
    frame.render_widget(Paragraph::new(third), rows[2]);
}
