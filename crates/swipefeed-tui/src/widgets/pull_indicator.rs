use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use swipefeed_core::{PullPhase, PullState};

use crate::theme::Theme;

pub struct PullIndicatorWidget;

impl PullIndicatorWidget {
    /// Text shown in the space opened above the feed
    pub fn label(state: &PullState, refresh_threshold: f64) -> &'static str {
        match state.phase {
            PullPhase::Idle | PullPhase::Resetting => "",
            PullPhase::Pulling if state.distance >= refresh_threshold => "↑ Release to refresh",
            PullPhase::Pulling => "↓ Pull to refresh",
            PullPhase::Refreshing => "⟳ Refreshing…",
        }
    }

    pub fn render(
        frame: &mut Frame,
        area: Rect,
        state: &PullState,
        refresh_threshold: f64,
        theme: &Theme,
    ) {
        if area.height == 0 {
            return;
        }

        let style = match state.phase {
            PullPhase::Refreshing => Style::default()
                .fg(theme.refreshing)
                .add_modifier(Modifier::BOLD),
            PullPhase::Pulling if state.distance >= refresh_threshold => {
                Style::default().fg(theme.pull_armed)
            }
            _ => Style::default().fg(theme.pull),
        };

        // Label sits on the last opened row, next to the content
        let label_area = Rect {
            y: area.y + area.height - 1,
            height: 1,
            ..area
        };
        let paragraph = Paragraph::new(Line::styled(Self::label(state, refresh_threshold), style))
            .alignment(Alignment::Center)
            .style(Style::default().bg(theme.raised));

        frame.render_widget(Paragraph::new("").style(Style::default().bg(theme.raised)), area);
        frame.render_widget(paragraph, label_area);
    }
}
