use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{InputMode, Notice};
use crate::theme::Theme;

pub struct StatusBar;

impl StatusBar {
    /// Mode on the left; the current notice, or key hints, on the right.
    pub fn render(frame: &mut Frame, area: Rect, mode: InputMode, notice: Option<&Notice>, theme: &Theme) {
        let w = area.width as usize;

        let mode_str = match mode {
            InputMode::Normal => "NORMAL",
            InputMode::Form => "EDIT",
            InputMode::Reactions => "REACT",
            InputMode::Comments => "COMMENT",
            InputMode::Help => "HELP",
        };

        let (right_text, right_style) = match notice {
            Some(n) if n.is_error => (format!(" {} ", n.text), theme.error),
            Some(n) => (format!(" {} ", n.text), theme.status.patch(theme.success)),
            None => (hints(mode, w).to_string(), theme.status),
        };

        let left = format!(" {mode_str} ");
        let padding_len = w.saturating_sub(left.chars().count() + right_text.chars().count());
        let padding = " ".repeat(padding_len);

        let line = Line::from(vec![
            Span::styled(left, theme.selected),
            Span::styled(padding, theme.status),
            Span::styled(right_text, right_style),
        ]);

        let bar = Paragraph::new(line).style(theme.status);
        frame.render_widget(bar, area);
    }
}

fn hints(mode: InputMode, w: usize) -> &'static str {
    match mode {
        InputMode::Normal if w >= 90 => {
            " jk:Select n:New e:Edit d:Del r:React c:Comments m:Theme L:Lang ?:Help q:Quit "
        }
        InputMode::Normal if w >= 50 => " jk:Select n:New e:Edit d:Del ?:Help q:Quit ",
        InputMode::Form if w >= 60 => " Tab:Next Enter:Save/Add label ←→:Chips Esc:Cancel ",
        InputMode::Reactions => " ←→:Choose Enter:React Esc:Close ",
        InputMode::Comments if w >= 50 => " Enter:Post Esc:Close ",
        _ => " ?:Help q:Quit ",
    }
}
