use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use swipefeed_core::PullPhase;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::theme::Theme;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else if let Some(view) = app.active_view() {
            let snapshot = view.snapshot();
            let phase = match snapshot.pull.phase {
                PullPhase::Idle => "IDLE",
                PullPhase::Pulling => "PULLING",
                PullPhase::Refreshing => "REFRESHING",
                PullPhase::Resetting => "RESETTING",
            };
            let pages = if snapshot.pagination.exhausted {
                "end"
            } else if snapshot.pagination.loading {
                "loading"
            } else {
                "more"
            };
            format!(
                " {} | {} | Items: {} | Pages: {}",
                view.kind.title(),
                phase,
                view.items.len(),
                pages
            )
        } else {
            String::new()
        };

        let text_color = if app.status_is_error && app.status_message.is_some() {
            theme.error
        } else {
            theme.text
        };

        let help_hint = " q:quit tab:feed j/k:scroll g:top enter:act ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(text_color).bg(theme.status_bar)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.status_bar)),
            Span::styled(
                help_hint,
                Style::default().fg(theme.text_muted).bg(theme.status_bar),
            ),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }
}
