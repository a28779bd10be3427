//! Rolling history bar charts.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Bar, BarChart, BarGroup, Block, Borders},
    Frame,
};

use crate::app::App;
use crate::data::MetricKey;

/// Render one history chart per metric, side by side.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
    for (key, column) in MetricKey::ALL.into_iter().zip(columns.iter()) {
        render_chart(frame, app, key, *column);
    }
}

fn render_chart(frame: &mut Frame, app: &App, key: MetricKey, area: Rect) {
    let theme = &app.theme;
    let config = &app.dashboard.configs()[key];
    let values = &app.view.charts[key];

    let block = Block::default()
        .title(Span::styled(format!(" {} history ", key.name()), theme.header))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border));

    // Each bar is coloured by the tier of its own reading, using this metric's
    // thresholds rather than one fixed pair shared by every chart.
    let bars: Vec<Bar> = values
        .iter()
        .map(|&v| {
            let tier = app.dashboard.status(key, v).tier;
            Bar::default()
                .value(config.clamp(v).round() as u64)
                .text_value(String::new())
                .style(Style::default().fg(theme.tier_color(tier)))
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let (bar_width, bar_gap) = bar_geometry(inner_width, bars.len());

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(bar_gap)
        .max(config.max.round() as u64);

    frame.render_widget(chart, area);
}

/// Widest bars (with a one-cell gap when room allows) that fit `count` bars.
fn bar_geometry(width: u16, count: usize) -> (u16, u16) {
    if count == 0 {
        return (1, 0);
    }
    let width = usize::from(width);
    if width >= count.saturating_mul(2) {
        let width_with_gap = width / count;
        let bar = u16::try_from(width_with_gap.saturating_sub(1)).unwrap_or(u16::MAX);
        (bar.max(1), 1)
    } else {
        (1, 0)
    }
}
