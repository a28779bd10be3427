//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::{ColorToken, Tier};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for titles and active elements.
    pub highlight: Color,
    /// Color for the high tier.
    pub warning: Color,
    /// Color for the danger tier.
    pub critical: Color,
    /// Color for the normal tier.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Unfilled part of a gauge.
    pub track: Color,
    /// Style for panel titles.
    pub header: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            track: Color::DarkGray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            track: Color::Gray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn tier_color(&self, tier: Tier) -> Color {
        match tier {
            Tier::Normal => self.healthy,
            Tier::High => self.warning,
            Tier::Danger => self.critical,
        }
    }

    /// Get style for a severity tier
    pub fn tier_style(&self, tier: Tier) -> Style {
        match tier {
            Tier::Danger => Style::default()
                .fg(self.critical)
                .add_modifier(Modifier::BOLD),
            _ => Style::default().fg(self.tier_color(tier)),
        }
    }

    /// Get style for the temperature hint
    pub fn hint_style(&self, color: ColorToken) -> Style {
        match color {
            ColorToken::Alarm => Style::default()
                .fg(self.critical)
                .add_modifier(Modifier::BOLD),
            ColorToken::Warning => Style::default().fg(self.warning),
            ColorToken::Neutral => Style::default().add_modifier(Modifier::DIM),
        }
    }

    /// Style for the connection indicator dot
    pub fn connection_style(&self, connected: bool) -> Style {
        if connected {
            Style::default().fg(self.healthy)
        } else {
            Style::default().fg(self.critical)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_colors_are_distinct() {
        let theme = Theme::dark();
        assert_ne!(theme.tier_color(Tier::Normal), theme.tier_color(Tier::High));
        assert_ne!(theme.tier_color(Tier::High), theme.tier_color(Tier::Danger));
        assert_eq!(theme.tier_style(Tier::Danger).fg, Some(Color::Red));
    }
}
