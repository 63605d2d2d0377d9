use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::popup_area;
use crate::journal::REACTIONS;
use crate::theme::Theme;

pub struct ReactionPicker;

impl ReactionPicker {
    pub fn render(frame: &mut Frame, area: Rect, selected: usize, title: &str, theme: &Theme) {
        let popup = popup_area(area, 44, 5);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!(" {title} "))
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(" ←/→ Enter Esc ", theme.dim)))
            .borders(Borders::ALL)
            .border_style(theme.border)
            .style(theme.base);

        let spans: Vec<Span> = REACTIONS
            .iter()
            .enumerate()
            .map(|(idx, reaction)| {
                let style = if idx == selected { theme.selected } else { theme.base };
                Span::styled(format!(" {reaction} "), style)
            })
            .collect();

        let row = Paragraph::new(vec![Line::from(""), Line::from(spans)])
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(row, popup);
    }
}
