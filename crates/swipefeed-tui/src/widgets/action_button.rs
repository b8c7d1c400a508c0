use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::FeedView;
use crate::theme::Theme;

const BADGE_LABEL: &str = "↑ New";
const BADGE_MIN_WIDTH: u16 = 9;
const BADGE_MAX_WIDTH: u16 = 21;

/// Floating elements drawn over the feed: the sticky action button and the
/// "new content" badge
pub struct ActionButtonWidget;

impl ActionButtonWidget {
    /// Badge width grows with the scroll velocity that brought the feed back
    /// to the top
    pub fn badge_width(scale: f64, available: u16) -> u16 {
        let scale = if scale.is_finite() { scale.clamp(0.0, 1.0) } else { 0.0 };
        let extra = ((BADGE_MAX_WIDTH - BADGE_MIN_WIDTH) as f64 * scale).round() as u16;
        (BADGE_MIN_WIDTH + extra).min(available)
    }

    pub fn render(frame: &mut Frame, area: Rect, view: &FeedView, theme: &Theme) {
        let sticky = view.snapshot().sticky;

        if sticky.active {
            let label = view.kind.action_label();
            let width = (label.chars().count() as u16 + 4).min(area.width);
            let height = 3.min(area.height);
            let button = Rect {
                x: area.x + area.width.saturating_sub(width + 2),
                y: area.y + area.height.saturating_sub(height + 1),
                width,
                height,
            };
            let paragraph = Paragraph::new(label)
                .alignment(Alignment::Center)
                .style(
                    Style::default()
                        .fg(theme.background)
                        .bg(theme.action)
                        .add_modifier(Modifier::BOLD),
                )
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(theme.action).bg(theme.background)),
                );
            frame.render_widget(Clear, button);
            frame.render_widget(paragraph, button);
        }

        if sticky.badge_visible {
            let width = Self::badge_width(sticky.badge_scale, area.width.saturating_sub(2));
            let badge = Rect {
                x: area.x + area.width.saturating_sub(width) / 2,
                y: area.y + 1.min(area.height.saturating_sub(1)),
                width,
                height: 1.min(area.height),
            };
            let paragraph = Paragraph::new(BADGE_LABEL)
                .alignment(Alignment::Center)
                .style(
                    Style::default()
                        .fg(theme.background)
                        .bg(theme.badge)
                        .add_modifier(Modifier::BOLD),
                );
            frame.render_widget(Clear, badge);
            frame.render_widget(paragraph, badge);
        }
    }
}
