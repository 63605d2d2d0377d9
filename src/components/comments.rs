use chrono::Local;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::popup_area;
use crate::app::CommentsPanel;
use crate::i18n::Strings;
use crate::theme::Theme;

pub struct CommentsPopup;

impl CommentsPopup {
    pub fn render(frame: &mut Frame, area: Rect, panel: &CommentsPanel, strings: &Strings, theme: &Theme) {
        let popup = popup_area(area, 64, 20);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!(" {} · {} ", strings.comments, panel.event_title))
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border)
            .style(theme.base);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).split(inner);

        let mut lines = Vec::new();
        if let Some(err) = &panel.error {
            lines.push(Line::from(Span::styled(err.clone(), theme.error)));
        } else if panel.comments.is_empty() {
            lines.push(Line::from(Span::styled(strings.no_comments, theme.dim)));
        }
        for comment in &panel.comments {
            lines.push(Line::from(vec![
                Span::styled(
                    comment.display_author().to_string(),
                    theme.header.add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    comment
                        .created_at
                        .map(|t| format!("  {}", t.with_timezone(&Local).format("%Y-%m-%d %H:%M")))
                        .unwrap_or_default(),
                    theme.dim,
                ),
            ]));
            lines.push(Line::from(comment.content.clone()));
            lines.push(Line::from(""));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), rows[0]);

        let input = Paragraph::new(Line::from(vec![
            Span::styled("> ", theme.dim),
            Span::styled(format!("{}_", panel.input), theme.selected),
        ]))
        .block(Block::default().borders(Borders::TOP).border_style(theme.border));
        frame.render_widget(input, rows[1]);
    }
}
