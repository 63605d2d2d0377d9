use chrono::{DateTime, Local};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::Tab;
use crate::i18n::Language;
use crate::theme::Theme;

pub struct Header;

impl Header {
    /// Clock and date on the left, tab switcher on the right.
    pub fn render(frame: &mut Frame, area: Rect, now: &DateTime<Local>, tab: Tab, language: Language, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme.border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let cols = Layout::horizontal([Constraint::Min(20), Constraint::Length(28)]).split(inner);

        let clock = vec![
            Line::from(Span::styled(now.format("%H:%M").to_string(), theme.header)),
            Line::from(Span::styled(language.header_date(now.date_naive()), theme.dim)),
        ];
        frame.render_widget(Paragraph::new(clock), cols[0]);

        let strings = language.strings();
        let selected = match tab {
            Tab::Countdown => 0,
            Tab::Journal => 1,
        };
        let tabs = Tabs::new(vec![
            format!("1 {}", strings.tab_countdown),
            format!("2 {}", strings.tab_journal),
        ])
        .select(selected)
        .style(theme.dim)
        .highlight_style(theme.selected)
        .divider("│");
        frame.render_widget(tabs, Rect { height: 1, ..cols[1] });
    }
}
