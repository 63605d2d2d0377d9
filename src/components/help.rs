use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::popup_area;
use crate::theme::Theme;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("j/k ↑/↓", "Select next/previous card"),
            ("Tab 1/2", "Countdown / Journal"),
        ],
    ),
    (
        "Events",
        &[
            ("n", "New event"),
            ("e", "Edit selected event"),
            ("d", "Delete selected event"),
            ("r", "React to selected event"),
            ("c", "Comments on selected event"),
            ("R", "Reload events"),
        ],
    ),
    (
        "Display",
        &[
            ("m", "Light / dark theme"),
            ("L", "English / 中文"),
            ("h", "Show / hide banner"),
            ("x", "Dismiss notice"),
        ],
    ),
];

pub struct HelpPopup;

impl HelpPopup {
    pub fn render(frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup = popup_area(area, 52, 24);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Keybindings ")
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border)
            .style(theme.base);

        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let key_style = theme.header;
        let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

        let mut lines = Vec::new();
        for (title, keys) in SECTIONS {
            lines.push(Line::from(Span::styled(*title, section_style)));
            for (key, desc) in *keys {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {key:<10}"), key_style),
                    Span::raw(*desc),
                ]));
            }
            lines.push(Line::from(""));
        }
        lines.push(Line::from(vec![
            Span::styled("  q", key_style),
            Span::styled(" / ", theme.dim),
            Span::styled("Esc     ", key_style),
            Span::raw("Quit / close popup"),
        ]));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}
