use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::PullIndicatorWidget;
use crate::app::{FeedItem, FeedView};
use crate::theme::Theme;
use crate::viewport::FOOTER_ROWS;

pub struct FeedListWidget;

impl FeedListWidget {
    pub fn render(frame: &mut Frame, area: Rect, view: &FeedView, is_active: bool, theme: &Theme) {
        let border_style = if is_active {
            Style::default().fg(theme.border_active)
        } else {
            Style::default().fg(theme.border)
        };

        let snapshot = view.snapshot();
        let block = Block::default()
            .title(format!(" {} ({}) ", view.kind.title(), view.items.len()))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(theme.background));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Opened space above the content while pulling or refreshing
        let geometry = view.geometry();
        let pull_rows = geometry
            .px_to_rows_ceil(snapshot.pull.distance)
            .min(inner.height);
        if pull_rows > 0 {
            let indicator = Rect {
                height: pull_rows,
                ..inner
            };
            PullIndicatorWidget::render(frame, indicator, &snapshot.pull, view.refresh_threshold(), theme);
        }
        let list_area = Rect {
            y: inner.y + pull_rows,
            height: inner.height - pull_rows,
            ..inner
        };

        let width = list_area.width as usize;
        let mut lines: Vec<Line> = Vec::new();
        for item in &view.items {
            lines.extend(item_lines(item, geometry.item_rows, width, theme));
        }

        let footer = if snapshot.pagination.loading {
            Span::styled("Loading more…", Style::default().fg(theme.loading))
        } else if snapshot.pagination.exhausted {
            Span::styled("You're all caught up", Style::default().fg(theme.text_muted))
        } else {
            Span::raw("")
        };
        for row in 0..FOOTER_ROWS {
            if row == FOOTER_ROWS - 1 {
                lines.push(Line::from(footer.clone()).centered());
            } else {
                lines.push(Line::default());
            }
        }

        let paragraph = Paragraph::new(lines).scroll((view.scroll_row(), 0));
        frame.render_widget(paragraph, list_area);
    }
}

/// Exactly `rows` lines for one item so offsets stay row-aligned
fn item_lines<'a>(item: &'a FeedItem, rows: u16, width: usize, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(Span::styled(
            truncate(&item.title, width),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate(&item.detail, width),
            Style::default().fg(theme.text_muted),
        )),
        Line::from(Span::styled(
            item.posted_at.format("%Y-%m-%d %H:%M").to_string(),
            Style::default().fg(theme.text_faint),
        )),
    ];
    lines.resize(rows as usize, Line::default());
    lines
}

/// Cut `text` to at most `width` display columns
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        // One column stays free for the ellipsis
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}
