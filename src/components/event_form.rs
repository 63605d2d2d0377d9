use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::popup_area;
use crate::i18n::Strings;
use crate::journal::{Event, EventDraft};
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Title,
    Date,
    Label,
    Labels,
    Notes,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Title => FormField::Date,
            FormField::Date => FormField::Label,
            FormField::Label => FormField::Labels,
            FormField::Labels => FormField::Notes,
            FormField::Notes => FormField::Title,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::Title => FormField::Notes,
            FormField::Date => FormField::Title,
            FormField::Label => FormField::Date,
            FormField::Labels => FormField::Label,
            FormField::Notes => FormField::Labels,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventFormState {
    pub draft: EventDraft,
    /// Text typed into the label box, not yet a chip.
    pub label_input: String,
    /// Highlighted chip while the chip row has focus.
    pub chip_index: usize,
    pub active_field: FormField,
    /// Id of the event being edited; `None` for a new one.
    pub editing: Option<String>,
}

impl EventFormState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            draft: EventDraft::new(today),
            label_input: String::new(),
            chip_index: 0,
            active_field: FormField::Title,
            editing: None,
        }
    }

    pub fn edit(event: &Event) -> Self {
        Self {
            draft: EventDraft::from_event(event),
            label_input: String::new(),
            chip_index: 0,
            active_field: FormField::Title,
            editing: Some(event.id.clone()),
        }
    }

    pub fn input_char(&mut self, c: char) {
        match self.active_field {
            FormField::Title => self.draft.title.push(c),
            FormField::Date => self.draft.date.push(c),
            FormField::Label => self.label_input.push(c),
            FormField::Notes => self.draft.comments.push(c),
            FormField::Labels => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.active_field {
            FormField::Title => { self.draft.title.pop(); }
            FormField::Date => { self.draft.date.pop(); }
            FormField::Label => { self.label_input.pop(); }
            FormField::Notes => { self.draft.comments.pop(); }
            FormField::Labels => self.remove_selected_label(),
        }
    }

    /// Turns the label box into a chip. Blank and duplicate labels are
    /// refused and the typed text is kept.
    pub fn commit_label(&mut self) -> bool {
        let added = self.draft.add_label(&self.label_input);
        if added {
            self.label_input.clear();
        }
        added
    }

    pub fn remove_selected_label(&mut self) {
        let Some(label) = self.draft.labels.get(self.chip_index).map(str::to_string) else {
            return;
        };
        self.draft.remove_label(&label);
        self.chip_index = self
            .chip_index
            .min(self.draft.labels.len().saturating_sub(1));
    }

    pub fn next_chip(&mut self) {
        if self.chip_index + 1 < self.draft.labels.len() {
            self.chip_index += 1;
        }
    }

    pub fn prev_chip(&mut self) {
        self.chip_index = self.chip_index.saturating_sub(1);
    }

    pub fn is_valid(&self) -> bool {
        self.draft.is_submittable()
    }
}

pub struct EventForm;

impl EventForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &EventFormState, strings: &Strings, theme: &Theme) {
        let form_area = popup_area(area, 56, 16);
        frame.render_widget(Clear, form_area);

        let title = if state.editing.is_some() {
            strings.edit_title
        } else {
            strings.add_title
        };
        let block = Block::default()
            .title(format!(" {title} "))
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border)
            .style(theme.base);

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // date
            Constraint::Length(1), // label input
            Constraint::Length(2), // chips
            Constraint::Length(3), // notes
            Constraint::Length(1), // spacer
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        let active = state.active_field;
        render_field(frame, rows[0], strings.event_name, &state.draft.title, active == FormField::Title, theme);
        render_field(frame, rows[1], strings.date_label, &state.draft.date, active == FormField::Date, theme);
        render_field(frame, rows[2], strings.add_label, &state.label_input, active == FormField::Label, theme);

        let mut chips = vec![Span::styled(format!("{:<8}", strings.labels), theme.dim)];
        for (idx, label) in state.draft.labels.iter().enumerate() {
            let style = if active == FormField::Labels && idx == state.chip_index {
                theme.selected
            } else {
                theme.highlight
            };
            chips.push(Span::styled(format!(" {label} ×"), style));
            chips.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(chips)).wrap(Wrap { trim: false }), rows[3]);

        let notes_style = if active == FormField::Notes { theme.selected } else { theme.dim };
        let cursor = if active == FormField::Notes { "_" } else { "" };
        let notes = Paragraph::new(format!("{}{cursor}", state.draft.comments))
            .block(Block::default().borders(Borders::TOP).title(strings.notes).border_style(notes_style))
            .wrap(Wrap { trim: false });
        frame.render_widget(notes, rows[4]);

        let submit_style = if state.is_valid() {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            theme.dim.add_modifier(Modifier::CROSSED_OUT)
        };
        let submit = if state.editing.is_some() { strings.update } else { strings.add };
        let help = Line::from(vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Next ", theme.dim),
            Span::styled("Enter", submit_style),
            Span::styled(format!(":{submit} "), theme.dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!(":{}", strings.cancel), theme.dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[6]);
    }
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool, theme: &Theme) {
    let cursor = if active { "_" } else { "" };
    let style = if active { theme.selected } else { Style::default() };

    let line = Line::from(vec![
        Span::styled(format!("{label:<8}"), theme.dim),
        Span::styled(format!("{value}{cursor}"), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::testing::event;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn new_form_defaults_date_to_today() {
        let form = EventFormState::new(today());
        assert_eq!(form.draft.date, "2026-10-19");
        assert!(!form.is_valid());
    }

    #[test]
    fn typing_goes_to_the_active_field() {
        let mut form = EventFormState::new(today());
        "Trip".chars().for_each(|c| form.input_char(c));
        form.active_field = form.active_field.next().next();
        "beach".chars().for_each(|c| form.input_char(c));
        form.active_field = FormField::Labels;
        form.input_char('x');

        assert_eq!(form.draft.title, "Trip");
        assert_eq!(form.label_input, "beach");
        assert!(form.is_valid());
    }

    #[test]
    fn labels_commit_and_remove() {
        let mut form = EventFormState::new(today());
        form.label_input = "  sea ".into();
        assert!(form.commit_label());
        assert!(form.label_input.is_empty());

        form.label_input = "sea".into();
        assert!(!form.commit_label());
        assert_eq!(form.label_input, "sea");

        form.label_input = "sun".into();
        form.commit_label();
        form.active_field = FormField::Labels;
        form.next_chip();
        form.next_chip();
        assert_eq!(form.chip_index, 1);
        form.backspace();
        assert_eq!(form.draft.labels.to_vec(), vec!["sea"]);
        assert_eq!(form.chip_index, 0);
    }

    #[test]
    fn edit_prefills_and_keeps_id() {
        let mut original = event("e1", "2026-12-24");
        original.reaction = Some("🔥".into());
        let form = EventFormState::edit(&original);
        assert_eq!(form.editing.as_deref(), Some("e1"));
        assert_eq!(form.draft.title, "event e1");
        assert_eq!(form.draft.reaction.as_deref(), Some("🔥"));
    }

    #[test]
    fn field_cycle_wraps() {
        assert_eq!(FormField::Notes.next(), FormField::Title);
        assert_eq!(FormField::Title.prev(), FormField::Notes);
    }
}
